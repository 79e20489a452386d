use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the active embedding model and vocabulary.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let embedder = state.pipeline.embedder();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "embedding_model": embedder.model_name(),
        "embedding_dimension": embedder.dimension(),
        "vocabulary_version": state.pipeline.extractor().vocabulary_version(),
        "semantic_boost": state.pipeline.hybrid_config().semantic_boost,
        "llm_explanations": state.explainer.is_some(),
    }))
}
