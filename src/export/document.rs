use std::fmt::Write as _;

use crate::core::{AnalysisResult, IssueKind, SentimentSummary, VideoInfo};

const WRAP_WIDTH: usize = 100;

/// Markdown report covering metadata, sentiment, questions and every comment.
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let title = result
        .video
        .as_ref()
        .map(|v| v.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(result.video_id.as_str());

    let _ = writeln!(out, "# Comment analysis: {title}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Video ID `{}`, analyzed {}.",
        result.video_id,
        result.analyzed_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out);

    out.push_str("## Video\n\n");
    match &result.video {
        Some(video) => write_video_table(&mut out, video),
        None => out.push_str("Video details unavailable.\n"),
    }
    out.push('\n');

    out.push_str("## Sentiment\n\n");
    write_sentiment_table(&mut out, &result.sentiment);
    out.push('\n');

    out.push_str("## Questions\n\n");
    match &result.questions {
        Some(report) => {
            out.push_str(report.as_str().trim_end());
            out.push('\n');
        }
        None => out.push_str("Question extraction did not complete.\n"),
    }
    out.push('\n');

    if !result.issues.is_empty() {
        out.push_str("## Issues\n\n");
        for issue in &result.issues {
            let kind = match issue.kind {
                IssueKind::NotFound => "not found",
                IssueKind::Failed => "failed",
            };
            let _ = writeln!(out, "- {:?} {kind}: {}", issue.step, issue.message);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Comments ({})", result.comments.len());
    out.push('\n');
    for comment in &result.comments {
        let _ = writeln!(
            out,
            "**{}** · {} · {} likes",
            escape_inline(&comment.author),
            comment.published_at.format("%Y-%m-%d %H:%M"),
            comment.like_count
        );
        out.push('\n');
        for paragraph in comment.plain_text().lines() {
            for line in textwrap::wrap(paragraph, WRAP_WIDTH) {
                let _ = writeln!(out, "> {line}");
            }
        }
        out.push('\n');
    }

    out
}

fn write_video_table(out: &mut String, video: &VideoInfo) {
    out.push_str("| Field | Value |\n|-------|-------|\n");
    let _ = writeln!(out, "| Title | {} |", escape_cell(&video.title));
    let _ = writeln!(out, "| Published | {} |", video.published_at.format("%Y-%m-%d"));
    let _ = writeln!(out, "| Views | {} |", video.view_count);
    let _ = writeln!(out, "| Likes | {} |", video.like_count);
    let _ = writeln!(out, "| Comments | {} |", video.comment_count);
    if !video.thumbnail_url.is_empty() {
        let _ = writeln!(out, "| Thumbnail | {} |", video.thumbnail_url);
    }
}

fn write_sentiment_table(out: &mut String, sentiment: &SentimentSummary) {
    out.push_str("| Sentiment | Comments | Share |\n|-----------|----------|-------|\n");
    for (label, count, share) in [
        ("Positive", sentiment.positive_count, sentiment.positive),
        ("Neutral", sentiment.neutral_count, sentiment.neutral),
        ("Negative", sentiment.negative_count, sentiment.negative),
    ] {
        let _ = writeln!(out, "| {label} | {count} | {:.1}% |", share * 100.0);
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn escape_inline(text: &str) -> String {
    text.replace('*', "\\*").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisStep, Comment, QuestionReport, StepIssue};
    use chrono::{TimeZone, Utc};

    fn result() -> AnalysisResult {
        let comments = vec![Comment {
            author: "Ana".into(),
            text: "Great video &amp; music".into(),
            like_count: 7,
            published_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        }];
        AnalysisResult {
            video_id: "abc123".into(),
            sentiment: crate::core::sentiment::classify(&comments),
            comments,
            questions: Some(QuestionReport(
                "Direct Questions:\nNone found.\n\nIndirect Questions:\nNone found.".into(),
            )),
            video: Some(VideoInfo {
                title: "Pipes | Fittings".into(),
                view_count: 1000,
                like_count: 50,
                comment_count: 1,
                published_at: Utc.with_ymd_and_hms(2024, 5, 30, 0, 0, 0).unwrap(),
                thumbnail_url: String::new(),
            }),
            issues: Vec::new(),
            analyzed_at: Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn report_contains_every_section() {
        let doc = render_markdown(&result());
        assert!(doc.starts_with("# Comment analysis: Pipes | Fittings"));
        assert!(doc.contains("| Title | Pipes \\| Fittings |"));
        assert!(doc.contains("| Positive | 1 | 100.0% |"));
        assert!(doc.contains("Indirect Questions:"));
        assert!(doc.contains("> Great video & music"));
        assert!(!doc.contains("## Issues"));
    }

    #[test]
    fn missing_parts_are_explained() {
        let mut r = result();
        r.video = None;
        r.questions = None;
        r.issues.push(StepIssue {
            step: AnalysisStep::Questions,
            kind: IssueKind::Failed,
            message: "quota exceeded".into(),
        });
        let doc = render_markdown(&r);
        assert!(doc.starts_with("# Comment analysis: abc123"));
        assert!(doc.contains("Video details unavailable."));
        assert!(doc.contains("Question extraction did not complete."));
        assert!(doc.contains("- Questions failed: quota exceeded"));
    }
}
