//! Keyword polarity classifier for comment text.

use crate::core::models::{Comment, SentimentSummary};

pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "awesome", "excellent", "amazing", "love", "like", "best",
];

pub const NEGATIVE_WORDS: &[&str] = &["bad", "terrible", "awful", "worst", "hate", "dislike", "poor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

/// Classify one text by substring match against the trigger words.
///
/// Positive triggers are checked first, so a text containing both kinds is positive.
/// Matching is on substrings: "unlikely" contains "like".
pub fn polarity(text: &str) -> Polarity {
    let lowered = text.to_lowercase();
    if POSITIVE_WORDS.iter().any(|w| lowered.contains(w)) {
        Polarity::Positive
    } else if NEGATIVE_WORDS.iter().any(|w| lowered.contains(w)) {
        Polarity::Negative
    } else {
        Polarity::Neutral
    }
}

pub fn classify(comments: &[Comment]) -> SentimentSummary {
    let mut summary = SentimentSummary::default();
    for comment in comments {
        match polarity(&comment.text) {
            Polarity::Positive => summary.positive_count += 1,
            Polarity::Neutral => summary.neutral_count += 1,
            Polarity::Negative => summary.negative_count += 1,
        }
    }

    let total = comments.len();
    if total > 0 {
        let total = total as f64;
        summary.positive = summary.positive_count as f64 / total;
        summary.neutral = summary.neutral_count as f64 / total;
        summary.negative = summary.negative_count as f64 / total;
    }
    summary
}
