//! Matching core: keyword extraction, semantic ranking, hybrid scoring and
//! batch ranking, plus the HTTP handlers that expose them.

pub mod handlers;
pub mod hybrid;
pub mod keyword_matcher;
pub mod keywords;
pub mod pipeline;
pub mod rank;
pub mod semantic;
pub mod suggestions;
pub mod vocabulary;

use thiserror::Error;

use crate::embeddings::EmbeddingError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{document} text is too short: {actual} characters, at least {min} required")]
    InputTooShort {
        document: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("{chunks} chunks but {embeddings} embeddings")]
    ChunkCountMismatch { chunks: usize, embeddings: usize },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
