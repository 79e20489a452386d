use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::ingestion::pdf::PdfError;
use crate::matching::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    InputTooShort(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InputTooShort { .. } => AppError::InputTooShort(err.to_string()),
            MatchError::DimensionMismatch { expected, actual } => {
                AppError::DimensionMismatch { expected, actual }
            }
            MatchError::Embedding(e) => AppError::Embedding(e),
            MatchError::ChunkCountMismatch { .. } => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InputTooShort(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INPUT_TOO_SHORT",
                msg.clone(),
            ),
            AppError::DimensionMismatch { .. } => {
                tracing::error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DIMENSION_MISMATCH",
                    self.to_string(),
                )
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMBEDDING_ERROR",
                    "The embedding provider failed".to_string(),
                )
            }
            AppError::Pdf(PdfError::TooShort { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INPUT_TOO_SHORT",
                self.to_string(),
            ),
            AppError::Pdf(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PDF_EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
