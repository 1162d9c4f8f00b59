//! Sentiment analytics over stored graph data: dashboard bucket counts and the
//! short per-application tone label shown in applicant lists.

use serde::{Deserialize, Serialize};

use crate::scoring::aggregate::GraphData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBucket {
    /// Buckets a stored sentiment label by keyword; anything unrecognized is neutral.
    pub fn from_label(label: &str) -> Self {
        if label.contains("Positive") {
            SentimentBucket::Positive
        } else if label.contains("Negative") {
            SentimentBucket::Negative
        } else {
            SentimentBucket::Neutral
        }
    }
}

/// Shown for applications that were never scored or carry no tone label.
pub const NOT_ANALYZED: &str = "Not Analyzed";

/// Keywords checked in order; the first one found becomes the short label.
const TONE_KEYWORDS: &[&str] = &["Positive", "Negative", "Neutral", "Nervous"];

/// Short tone label for one application. Labels without a known keyword are
/// passed through as stored.
pub fn application_sentiment(graph: Option<&GraphData>) -> String {
    let Some(label) = graph.map(|g| g.sentiment.trim()).filter(|l| !l.is_empty()) else {
        return NOT_ANALYZED.to_string();
    };
    TONE_KEYWORDS
        .iter()
        .find(|keyword| label.contains(*keyword))
        .map_or_else(|| label.to_string(), |keyword| keyword.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

/// Counts applications per bucket. Applications without graph data are skipped.
pub fn sentiment_distribution<'a>(
    graphs: impl IntoIterator<Item = Option<&'a GraphData>>,
) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for graph in graphs.into_iter().flatten() {
        match SentimentBucket::from_label(&graph.sentiment) {
            SentimentBucket::Positive => dist.positive += 1,
            SentimentBucket::Neutral => dist.neutral += 1,
            SentimentBucket::Negative => dist.negative += 1,
        }
    }
    dist
}
