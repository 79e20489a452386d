//! Semantic Matcher: cosine similarity between resume chunks and a job vector.

use serde::{Deserialize, Serialize};

use crate::ingestion::chunking::Chunk;
use crate::matching::MatchError;

/// How many of the best chunks are averaged into the request-level semantic score.
pub const SEMANTIC_TOP_N: usize = 3;

/// A chunk scored against one job vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchChunk {
    pub chunk: Chunk,
    pub score: f64,
}

/// Cosine similarity; zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Scores every chunk against `job_embedding`, sorts descending and keeps `top_k`.
///
/// The sort is stable: chunks with equal scores keep their original order.
pub fn rank_chunks(
    chunks: &[Chunk],
    chunk_embeddings: &[Vec<f32>],
    job_embedding: &[f32],
    top_k: usize,
) -> Result<Vec<MatchChunk>, MatchError> {
    if chunks.len() != chunk_embeddings.len() {
        return Err(MatchError::ChunkCountMismatch {
            chunks: chunks.len(),
            embeddings: chunk_embeddings.len(),
        });
    }

    let mut scored = chunks
        .iter()
        .zip(chunk_embeddings)
        .map(|(chunk, embedding)| {
            // job vector is the reference dimensionality
            let score = cosine_similarity(job_embedding, embedding)?;
            Ok(MatchChunk {
                chunk: chunk.clone(),
                score,
            })
        })
        .collect::<Result<Vec<_>, MatchError>>()?;

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    Ok(scored)
}

/// Mean of the best [`SEMANTIC_TOP_N`] scores of an already-ranked list.
/// Averages over fewer when fewer exist; an empty list scores 0.0.
pub fn semantic_score(ranked: &[MatchChunk]) -> f64 {
    let top = &ranked[..ranked.len().min(SEMANTIC_TOP_N)];
    if top.is_empty() {
        return 0.0;
    }
    top.iter().map(|c| c.score).sum::<f64>() / top.len() as f64
}
