//! OpenAI-compatible embeddings client.
//!
//! Fails fast: no retries. Callers that want retry or degradation wrap the
//! provider themselves.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embeddings::{Embedding, EmbeddingError, EmbeddingProvider};

/// Inputs per request; larger batches are split.
const MAX_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Expected output dimensionality; every returned vector is checked against it.
    pub dimension: usize,
    /// Forward `dimensions` in the request body (for models that support truncation).
    pub request_dimensions: bool,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
    request_dimensions: bool,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        if config.base_url.trim().is_empty() {
            return Err(EmbeddingError::Config("missing embedding API URL".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(EmbeddingError::Config("missing embedding model name".to_string()));
        }
        if config.dimension == 0 {
            return Err(EmbeddingError::Config(
                "embedding dimension must be positive".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: embeddings_endpoint(&config.base_url),
            api_key: config.api_key,
            model: config.model,
            dimension: config.dimension,
            request_dimensions: config.request_dimensions,
        })
    }

    async fn embed_one_batch(&self, inputs: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
            dimensions: self.request_dimensions.then_some(self.dimension),
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Embedding API returned {}: {}", status, message);
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        into_vectors(parsed, inputs.len(), self.dimension)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            vectors.extend(self.embed_one_batch(batch).await?);
        }
        debug!(
            "Embedded {} texts with {} ({} dims)",
            texts.len(),
            self.model,
            self.dimension
        );
        Ok(vectors)
    }
}

/// Accepts either a base URL (`.../v1`) or the full `/embeddings` URL.
fn embeddings_endpoint(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with("/embeddings") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/embeddings")
    }
}

/// Restores input order and validates count, indices, dimensionality and values.
///
/// Indices must be exactly `0..requested`; every component must be finite.
fn into_vectors(
    mut response: EmbeddingResponse,
    requested: usize,
    dimension: usize,
) -> Result<Vec<Embedding>, EmbeddingError> {
    if response.data.len() != requested {
        return Err(EmbeddingError::CountMismatch {
            requested,
            returned: response.data.len(),
        });
    }

    response.data.sort_by_key(|entry| entry.index);

    response
        .data
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            // sorted, so any gap or duplicate shows up as a position mismatch
            if entry.index != position {
                return Err(EmbeddingError::InvalidIndex {
                    index: entry.index,
                    requested,
                });
            }
            if entry.embedding.len() != dimension {
                return Err(EmbeddingError::Dimension {
                    expected: dimension,
                    actual: entry.embedding.len(),
                });
            }
            if entry.embedding.iter().any(|v| !v.is_finite()) {
                return Err(EmbeddingError::NonFinite { index: entry.index });
            }
            Ok(entry.embedding)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> HttpEmbedderConfig {
        HttpEmbedderConfig {
            base_url: base_url.to_string(),
            api_key: None,
            model: "all-mpnet-base-v2".to_string(),
            dimension: 3,
            request_dimensions: false,
            timeout: Duration::from_secs(5),
        }
    }

    fn response(json: &str) -> EmbeddingResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_endpoint_from_base_url() {
        assert_eq!(
            embeddings_endpoint("http://localhost:8081/v1/"),
            "http://localhost:8081/v1/embeddings"
        );
        assert_eq!(
            embeddings_endpoint("http://localhost:8081/v1/embeddings"),
            "http://localhost:8081/v1/embeddings"
        );
    }

    #[test]
    fn test_new_rejects_missing_url() {
        assert!(matches!(
            HttpEmbedder::new(config("  ")),
            Err(EmbeddingError::Config(_))
        ));
    }

    #[test]
    fn test_new_reports_model_and_dimension() {
        let embedder = HttpEmbedder::new(config("http://localhost:8081/v1")).unwrap();
        assert_eq!(embedder.model_name(), "all-mpnet-base-v2");
        assert_eq!(embedder.dimension(), 3);
    }

    #[test]
    fn test_into_vectors_restores_input_order() {
        let parsed = response(
            r#"{"data": [
                {"index": 1, "embedding": [0.0, 1.0, 0.0]},
                {"index": 0, "embedding": [1.0, 0.0, 0.0]}
            ]}"#,
        );
        let vectors = into_vectors(parsed, 2, 3).unwrap();
        assert_eq!(vectors[0], vec![1.0, 0.0, 0.0]);
        assert_eq!(vectors[1], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_into_vectors_rejects_wrong_dimension() {
        let parsed = response(r#"{"data": [{"index": 0, "embedding": [1.0, 0.0]}]}"#);
        let err = into_vectors(parsed, 1, 3).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::Dimension {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_into_vectors_rejects_wrong_count() {
        let parsed = response(r#"{"data": []}"#);
        assert!(matches!(
            into_vectors(parsed, 2, 3),
            Err(EmbeddingError::CountMismatch {
                requested: 2,
                returned: 0
            })
        ));
    }

    #[test]
    fn test_into_vectors_rejects_duplicate_indices() {
        let parsed = response(
            r#"{"data": [
                {"index": 0, "embedding": [1.0, 0.0, 0.0]},
                {"index": 0, "embedding": [0.0, 1.0, 0.0]}
            ]}"#,
        );
        assert!(matches!(
            into_vectors(parsed, 2, 3),
            Err(EmbeddingError::InvalidIndex {
                index: 0,
                requested: 2
            })
        ));
    }

    #[test]
    fn test_into_vectors_rejects_out_of_range_index() {
        let parsed = response(r#"{"data": [{"index": 5, "embedding": [1.0, 0.0, 0.0]}]}"#);
        assert!(matches!(
            into_vectors(parsed, 1, 3),
            Err(EmbeddingError::InvalidIndex { index: 5, .. })
        ));
    }

    #[test]
    fn test_into_vectors_rejects_non_finite_components() {
        // 1e39 overflows f32 and deserializes as infinity
        let parsed = response(
            r#"{"data": [
                {"index": 0, "embedding": [1.0, 0.0, 0.0]},
                {"index": 1, "embedding": [1e39, 1.0, 0.0]}
            ]}"#,
        );
        assert!(matches!(
            into_vectors(parsed, 2, 3),
            Err(EmbeddingError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn test_request_omits_dimensions_when_not_requested() {
        let inputs = vec!["hello".to_string()];
        let body = serde_json::to_value(EmbeddingRequest {
            model: "m",
            input: &inputs,
            dimensions: None,
        })
        .unwrap();
        assert!(body.get("dimensions").is_none());
        assert_eq!(body["input"][0], "hello");
    }

    #[tokio::test]
    async fn test_embed_batch_against_local_server() {
        use axum::{routing::post, Json, Router};
        use serde_json::{json, Value};

        let router = Router::new().route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                let count = body["input"].as_array().map(Vec::len).unwrap_or(0);
                // reversed order exercises index-based reordering
                let data: Vec<Value> = (0..count)
                    .rev()
                    .map(|i| json!({"index": i, "embedding": [i as f32, 0.0, 1.0]}))
                    .collect();
                Json(json!({ "data": data }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let embedder = HttpEmbedder::new(config(&format!("http://{addr}/v1"))).unwrap();
        let texts: Vec<String> = (0..3).map(|i| format!("text {i}")).collect();
        let vectors = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[2], vec![2.0, 0.0, 1.0]);
    }
}
