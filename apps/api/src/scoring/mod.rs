// Candidate scoring core.
// Normalize → (Match + Sentiment) → Aggregate. Pure and synchronous apart from
// `pipeline`, which gathers resume and transcript text before scoring.

pub mod aggregate;
pub mod analytics;
pub mod fuzzy;
pub mod handlers;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod sentiment;
pub mod skills;
pub mod synonyms;

use thiserror::Error;

/// Why a text source yielded nothing. Logged, then replaced with empty text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("document is neither a PDF nor UTF-8 text")]
    UnsupportedDocument,

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("no text found in source")]
    NoText,

    #[error("media I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("audio extraction failed: {0}")]
    Audio(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("transcription timed out after {0}s")]
    Timeout(u64),
}

/// Internal aggregation failure. Never escapes `aggregate`.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{verdicts} verdicts for {required} required skills")]
    VerdictMismatch { verdicts: usize, required: usize },

    #[error("matcher reported {reported} matches but {counted} verdicts are matched")]
    MatchCountMismatch { reported: usize, counted: usize },
}
