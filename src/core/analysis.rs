use crate::core::models::{
    AnalysisResult, AnalysisStep, IssueKind, SortOrder, StepIssue, sort_comments,
};
use crate::core::questions::{CompletionService, QuestionExtractor};
use crate::core::sentiment;
use crate::core::youtube::{FetchLimits, YouTubeClient};
use crate::error::{Error, Result};

/// Runs the fetch, classify and extract steps for one video.
pub struct Analyzer<C> {
    youtube: YouTubeClient,
    questions: QuestionExtractor<C>,
    limits: FetchLimits,
}

impl<C: CompletionService> Analyzer<C> {
    pub fn new(youtube: YouTubeClient, questions: QuestionExtractor<C>, limits: FetchLimits) -> Self {
        Self {
            youtube,
            questions,
            limits,
        }
    }

    /// Analyze `video_id` from scratch.
    ///
    /// Only an empty id or a failed comment fetch is fatal. Question extraction and metadata
    /// lookup failures are recorded in [`AnalysisResult::issues`].
    pub async fn analyze(&self, video_id: &str) -> Result<AnalysisResult> {
        self.analyze_with_progress(video_id, |_| {}).await
    }

    /// Same as [`Self::analyze`], calling `progress` as each step starts.
    pub async fn analyze_with_progress<F>(
        &self,
        video_id: &str,
        mut progress: F,
    ) -> Result<AnalysisResult>
    where
        F: FnMut(Stage) + Send,
    {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(Error::validation("video ID cannot be empty"));
        }

        progress(Stage::FetchingComments);
        let mut comments = self.youtube.fetch_all_comments(video_id, self.limits).await?;
        sort_comments(&mut comments, SortOrder::Newest);

        progress(Stage::ClassifyingSentiment);
        let sentiment = sentiment::classify(&comments);

        let mut issues = Vec::new();

        progress(Stage::ExtractingQuestions);
        let questions = match self.questions.extract_questions(&comments).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(video_id, error = %e, "question extraction failed");
                issues.push(StepIssue {
                    step: AnalysisStep::Questions,
                    kind: IssueKind::Failed,
                    message: e.to_string(),
                });
                None
            }
        };

        progress(Stage::FetchingMetadata);
        let video = match self.youtube.fetch_video_info(video_id).await {
            Ok(Some(info)) => Some(info),
            Ok(None) => {
                issues.push(StepIssue {
                    step: AnalysisStep::Metadata,
                    kind: IssueKind::NotFound,
                    message: format!("no video found for ID {video_id}"),
                });
                None
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "metadata lookup failed");
                issues.push(StepIssue {
                    step: AnalysisStep::Metadata,
                    kind: IssueKind::Failed,
                    message: e.to_string(),
                });
                None
            }
        };

        progress(Stage::Done);
        tracing::info!(
            video_id,
            comments = comments.len(),
            issues = issues.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            video_id: video_id.to_string(),
            comments,
            sentiment,
            questions,
            video,
            issues,
            analyzed_at: chrono::Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingComments,
    ClassifyingSentiment,
    ExtractingQuestions,
    FetchingMetadata,
    Done,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::FetchingComments => "Fetching comments...",
            Self::ClassifyingSentiment => "Classifying sentiment...",
            Self::ExtractingQuestions => "Extracting questions...",
            Self::FetchingMetadata => "Fetching video details...",
            Self::Done => "Completed",
        }
    }

    pub fn progress(self) -> f64 {
        match self {
            Self::FetchingComments => 0.1,
            Self::ClassifyingSentiment => 0.4,
            Self::ExtractingQuestions => 0.5,
            Self::FetchingMetadata => 0.85,
            Self::Done => 1.0,
        }
    }
}
