pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

/// PDF uploads are small, but larger than axum's 2 MB default allows for.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/match/upload", post(handlers::handle_match_upload))
        .route("/api/v1/jobs/sections", post(handlers::handle_job_sections))
        .route("/api/v1/keywords", post(handlers::handle_keywords))
        .route("/api/v1/rank", post(handlers::handle_rank))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
