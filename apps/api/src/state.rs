use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ResumeScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring backend picked at startup from `GROQ_API_KEY` and `SCORING_MODE`.
    pub scorer: Arc<dyn ResumeScorer>,
}
