//! Embedding providers: pluggable, trait-based text → vector encoders.
//!
//! `HttpEmbedder` talks to any OpenAI-compatible `/embeddings` endpoint
//! (e.g. a server hosting `all-mpnet-base-v2`). `HashingEmbedder` is a
//! deterministic local encoder used when no endpoint is configured.
//!
//! A provider is built once in `main` and shared as `Arc<dyn EmbeddingProvider>`.

use async_trait::async_trait;
use thiserror::Error;

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

/// A dense embedding vector.
pub type Embedding = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned {returned} embeddings for {requested} inputs")]
    CountMismatch { requested: usize, returned: usize },

    #[error("provider returned a {actual}-dimensional vector, expected {expected}")]
    Dimension { expected: usize, actual: usize },

    #[error("provider returned embedding index {index} for a batch of {requested}")]
    InvalidIndex { index: usize, requested: usize },

    #[error("provider returned a non-finite component in embedding {index}")]
    NonFinite { index: usize },

    #[error("invalid embedding provider configuration: {0}")]
    Config(String),
}

/// The embedding provider seam. Implement this to swap backends without
/// touching the pipeline or handlers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the underlying model, for logs and responses.
    fn model_name(&self) -> &str;

    /// Output dimensionality, fixed for the lifetime of the provider.
    fn dimension(&self) -> usize;

    /// Encodes several texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Encodes one text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                requested: 1,
                returned: vectors.len(),
            });
        }
        Ok(vectors.remove(0))
    }
}
