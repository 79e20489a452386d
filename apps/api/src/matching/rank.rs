//! Batch Ranker: ranks many resumes against one job by their best chunk.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embeddings::EmbeddingProvider;
use crate::ingestion::chunking::{chunk_document, ChunkingConfig};
use crate::matching::semantic::{rank_chunks, MatchChunk};
use crate::matching::MatchError;

pub const DEFAULT_RANK_TOP_K: usize = 20;
pub const DEFAULT_RANK_TOP_N: usize = 5;
const REASON_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub resume_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based.
    pub rank: usize,
    pub resume_id: String,
    /// Best chunk score of this resume.
    pub score: f64,
    pub match_reason: String,
}

/// Chunks every resume with [`ChunkingConfig::BATCH`], keeps the `top_k` best
/// chunks overall and aggregates them per resume.
pub async fn rank_resumes(
    embedder: &dyn EmbeddingProvider,
    job_text: &str,
    resumes: &[ResumeDocument],
    top_k: usize,
    top_n: usize,
) -> Result<Vec<RankedCandidate>, MatchError> {
    let mut owners = HashMap::new();
    let mut chunks = Vec::new();
    for resume in resumes {
        for chunk in chunk_document(&resume.resume_id, &resume.text, ChunkingConfig::BATCH) {
            if let Some(id) = &chunk.id {
                owners.insert(id.clone(), resume.resume_id.clone());
            }
            chunks.push(chunk);
        }
    }
    debug!("Ranking {} chunks from {} resumes", chunks.len(), resumes.len());

    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let chunk_embeddings = embedder.embed_batch(&texts).await?;
    let job_embedding = embedder.embed(job_text).await?;

    let ranked = rank_chunks(&chunks, &chunk_embeddings, &job_embedding, top_k)?;
    Ok(aggregate_candidates(&ranked, &owners, top_n))
}

/// Max score per resume, descending, first appearance wins ties.
/// `ranked` must already be sorted best-first.
pub fn aggregate_candidates(
    ranked: &[MatchChunk],
    owners: &HashMap<String, String>,
    top_n: usize,
) -> Vec<RankedCandidate> {
    let mut best: Vec<(&str, &MatchChunk)> = Vec::new();
    for scored in ranked {
        let Some(owner) = scored.chunk.id.as_ref().and_then(|id| owners.get(id)) else {
            continue;
        };
        match best.iter_mut().find(|(id, _)| *id == owner.as_str()) {
            Some(entry) if scored.score > entry.1.score => entry.1 = scored,
            Some(_) => {}
            None => best.push((owner.as_str(), scored)),
        }
    }

    best.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));

    best.into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, (resume_id, chunk))| RankedCandidate {
            rank: i + 1,
            resume_id: resume_id.to_string(),
            score: chunk.score,
            match_reason: match_reason(&chunk.chunk.text),
        })
        .collect()
}

/// First 200 characters of the best chunk, always followed by `...`.
pub fn match_reason(text: &str) -> String {
    let snippet: String = text.chars().take(REASON_CHARS).collect();
    format!("{snippet}...")
}
