use std::sync::Arc;

use crate::explanation::Explainer;
use crate::matching::pipeline::MatchPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Embedding provider, compiled vocabulary and scoring weights, built once in `main`.
    pub pipeline: MatchPipeline,
    /// Pluggable explainer. `None` when no LLM key is configured.
    pub explainer: Option<Arc<dyn Explainer>>,
}
