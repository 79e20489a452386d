use std::hash::BuildHasher;

use ahash::RandomState;
use async_trait::async_trait;

use crate::embeddings::{Embedding, EmbeddingError, EmbeddingProvider};

/// Bucket assignment depends on the hash seeds below and the locked `ahash`
/// version, so the crate version is part of the model name.
const MODEL_NAME: &str = concat!("local-feature-hashing-", env!("CARGO_PKG_VERSION"));

const HASH_SEEDS: [u64; 4] = [
    0x5265_7375_6d65_4d61,
    0x7463_6865_7246_6561,
    0x7475_7265_4861_7368,
    0x696e_6756_6563_746f,
];

/// Deterministic bag-of-features encoder.
///
/// Lowercased words and character trigrams are hashed into a fixed number of
/// buckets, words weighted double, and the result is L2-normalised. The hasher
/// is fixed-seed, so vectors are identical across processes and runs; they
/// carry lexical, not semantic, signal.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    hasher: RandomState,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "hashing embedder dimension must be positive".to_string(),
            ));
        }
        let [k0, k1, k2, k3] = HASH_SEEDS;
        Ok(Self {
            dimension,
            hasher: RandomState::with_seeds(k0, k1, k2, k3),
        })
    }

    pub fn encode(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0_f32; self.dimension];
        let normalized = text.to_lowercase();

        for word in normalized.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.is_empty() {
                continue;
            }
            vector[self.bucket(word)] += 2.0;

            let chars: Vec<char> = word.chars().collect();
            for trigram in chars.windows(3) {
                let trigram: String = trigram.iter().collect();
                vector[self.bucket(&trigram)] += 1.0;
            }
        }

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > f32::EPSILON {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }

    fn bucket(&self, feature: &str) -> usize {
        (self.hasher.hash_one(feature) % self.dimension as u64) as usize
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::semantic::cosine_similarity;

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            HashingEmbedder::new(0),
            Err(EmbeddingError::Config(_))
        ));
    }

    #[test]
    fn test_encode_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(128).unwrap();
        let a = embedder.encode("Senior Rust engineer building distributed systems");
        let b = embedder.encode("Senior Rust engineer building distributed systems");
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_separate_instances_agree() {
        let text = "Kubernetes operator written in Go";
        let a = HashingEmbedder::new(97).unwrap().encode(text);
        let b = HashingEmbedder::new(97).unwrap().encode(text);
        assert_eq!(a, b);
        assert!(HashingEmbedder::new(97)
            .unwrap()
            .model_name()
            .starts_with("local-feature-hashing-"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16).unwrap();
        assert!(embedder.encode("  ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_overlapping_text_is_more_similar() {
        let embedder = HashingEmbedder::new(256).unwrap();
        let job = embedder.encode("python machine learning engineer with pytorch");
        let close = embedder.encode("machine learning engineer, python and pytorch daily");
        let far = embedder.encode("pastry chef specialising in french desserts");
        let close_score = cosine_similarity(&job, &close).unwrap();
        let far_score = cosine_similarity(&job, &far).unwrap();
        assert!(close_score > far_score, "{close_score} <= {far_score}");
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order_and_dimension() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let vectors = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.len() == 64));
        assert_eq!(vectors[0], embedder.encode("alpha"));
        assert_eq!(embedder.embed("beta").await.unwrap(), vectors[1]);
    }
}
