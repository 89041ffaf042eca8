use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A top-level comment as returned by the comment listing endpoint.
///
/// `text` is the API's display text and may contain HTML markup and entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
}

impl Comment {
    /// Comment text with markup removed and entities decoded.
    pub fn plain_text(&self) -> String {
        strip_markup(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub published_at: DateTime<Utc>,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
}

impl SentimentSummary {
    pub fn total(&self) -> usize {
        self.positive_count + self.neutral_count + self.negative_count
    }
}

/// Free-form output of the question extraction step.
///
/// The text is kept exactly as the completion service produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionReport(pub String);

impl QuestionReport {
    pub const DIRECT_HEADING: &'static str = "Direct Questions";
    pub const INDIRECT_HEADING: &'static str = "Indirect Questions";
    pub const NONE_FOUND: &'static str = "None found.";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort split into the direct and indirect sections for display.
    ///
    /// Returns `None` for a section whose heading is missing. The report is never rejected.
    pub fn sections(&self) -> (Option<String>, Option<String>) {
        let mut direct: Option<Vec<&str>> = None;
        let mut indirect: Option<Vec<&str>> = None;
        let mut current: Option<&mut Vec<&str>> = None;

        for line in self.0.lines() {
            let heading = line
                .trim()
                .trim_start_matches('#')
                .trim()
                .trim_matches('*')
                .trim_end_matches(':')
                .trim();

            if heading.eq_ignore_ascii_case(Self::DIRECT_HEADING) {
                current = Some(direct.insert(Vec::new()));
            } else if heading.eq_ignore_ascii_case(Self::INDIRECT_HEADING) {
                current = Some(indirect.insert(Vec::new()));
            } else if let Some(lines) = current.as_mut() {
                lines.push(line);
            }
        }

        let finish = |lines: Option<Vec<&str>>| lines.map(|l| l.join("\n").trim().to_string());
        (finish(direct), finish(indirect))
    }

    pub fn is_empty_section(section: &str) -> bool {
        section.trim().eq_ignore_ascii_case(Self::NONE_FOUND)
    }
}

impl std::fmt::Display for QuestionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStep {
    Questions,
    Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    NotFound,
    Failed,
}

/// A step that did not produce its output but did not abort the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepIssue {
    pub step: AnalysisStep,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub video_id: String,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub sentiment: SentimentSummary,
    pub questions: Option<QuestionReport>,
    pub video: Option<VideoInfo>,
    pub issues: Vec<StepIssue>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn issue(&self, step: AnalysisStep) -> Option<&StepIssue> {
        self.issues.iter().find(|issue| issue.step == step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    #[value(name = "likes")]
    MostLiked,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::MostLiked,
            Self::MostLiked => Self::Newest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "newest first",
            Self::Oldest => "oldest first",
            Self::MostLiked => "most liked",
        }
    }
}

pub fn sort_comments(comments: &mut [Comment], order: SortOrder) {
    match order {
        SortOrder::Newest => comments.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortOrder::Oldest => comments.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
        SortOrder::MostLiked => comments.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
    }
}

/// Sorted copy; the input is left untouched.
pub fn sorted(comments: &[Comment], order: SortOrder) -> Vec<Comment> {
    let mut out = comments.to_vec();
    sort_comments(&mut out, order);
    out
}

/// View of at most `len` comments starting at `offset`, clamped to the collection.
pub fn window(comments: &[Comment], offset: usize, len: usize) -> &[Comment] {
    let start = offset.min(comments.len());
    let end = start.saturating_add(len).min(comments.len());
    &comments[start..end]
}

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));
static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:p|div|li|ul|ol|blockquote|h[1-6])\b[^>]*>").expect("valid block tag regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"));

/// `<br>` and block tags become line breaks, other tags are dropped, then entities are decoded.
fn strip_markup(html: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(html, "\n");
    let text = BLOCK_TAG_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let decoded = html_escape::decode_html_entities(&text);

    let lines: Vec<&str> = decoded.lines().map(str::trim_end).collect();
    let mut out = String::with_capacity(decoded.len());
    let mut blank_run = 0;
    for line in lines {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if !out.is_empty() || !line.is_empty() {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(author: &str, likes: u64, day: u32) -> Comment {
        Comment {
            author: author.to_string(),
            text: format!("comment by {author}"),
            like_count: likes,
            published_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn sorts_newest_first_by_default() {
        let comments = vec![comment("a", 1, 1), comment("b", 5, 3), comment("c", 2, 2)];
        let out = sorted(&comments, SortOrder::default());
        let authors: Vec<_> = out.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, ["b", "c", "a"]);
    }

    #[test]
    fn sorts_by_likes_and_oldest() {
        let comments = vec![comment("a", 1, 1), comment("b", 5, 3), comment("c", 2, 2)];
        let liked: Vec<_> = sorted(&comments, SortOrder::MostLiked)
            .into_iter()
            .map(|c| c.author)
            .collect();
        assert_eq!(liked, ["b", "c", "a"]);

        let oldest: Vec<_> = sorted(&comments, SortOrder::Oldest)
            .into_iter()
            .map(|c| c.author)
            .collect();
        assert_eq!(oldest, ["a", "c", "b"]);
    }

    #[test]
    fn window_clamps_to_bounds() {
        let comments = vec![comment("a", 1, 1), comment("b", 5, 3), comment("c", 2, 2)];
        assert_eq!(window(&comments, 0, 2).len(), 2);
        assert_eq!(window(&comments, 2, 10).len(), 1);
        assert!(window(&comments, 5, 10).is_empty());
        assert_eq!(window(&comments, 0, usize::MAX).len(), 3);
    }

    #[test]
    fn plain_text_strips_tags_and_entities() {
        let mut c = comment("a", 0, 1);
        c.text = "Great &amp; useful<br>see <a href=\"https://x.y\">this</a> &quot;now&quot;".into();
        assert_eq!(c.plain_text(), "Great & useful\nsee this \"now\"");
    }

    #[test]
    fn plain_text_breaks_on_block_tags_only() {
        let mut c = comment("a", 0, 1);
        c.text = "a<p>b</p>c".into();
        assert_eq!(c.plain_text(), "a\nb\nc");

        c.text = "<brb>hi</brb>".into();
        assert_eq!(c.plain_text(), "hi");

        c.text = "one<br/><br /><br>two &lt;3".into();
        assert_eq!(c.plain_text(), "one\n\ntwo <3");
    }

    #[test]
    fn splits_report_sections() {
        let report = QuestionReport(
            "Direct Questions:\n1. Alice: How long did this take?\n\nIndirect Questions:\nNone found.\n"
                .to_string(),
        );
        let (direct, indirect) = report.sections();
        assert_eq!(direct.as_deref(), Some("1. Alice: How long did this take?"));
        let indirect = indirect.expect("indirect section");
        assert!(QuestionReport::is_empty_section(&indirect));
    }

    #[test]
    fn splits_markdown_headed_sections() {
        let report = QuestionReport("## **Direct Questions**\n1. Bob: Why?\n### Indirect Questions:\n1. Eve: wonder if".into());
        let (direct, indirect) = report.sections();
        assert_eq!(direct.as_deref(), Some("1. Bob: Why?"));
        assert_eq!(indirect.as_deref(), Some("1. Eve: wonder if"));
    }

    #[test]
    fn missing_sections_are_none() {
        let report = QuestionReport("the model rambled".into());
        assert_eq!(report.sections(), (None, None));
    }
}
