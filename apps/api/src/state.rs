use crate::scoring::pipeline::CandidateScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume + transcript scorer. The speech backend inside is chosen at startup
    /// from `SPEECH_API_URL`.
    pub scorer: CandidateScorer,
}
