//! Match pipeline: one resume against one job, end to end.
//!
//! validate → extract job sections → chunk resume → embed → rank chunks →
//! semantic score → keyword extraction → section-aware keyword match → fusion.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::embeddings::EmbeddingProvider;
use crate::ingestion::chunking::{chunk_text, ChunkingConfig};
use crate::ingestion::job_sections::{extract_sections, JobSections};
use crate::matching::hybrid::{self, HybridConfig, ScoreBreakdown};
use crate::matching::keyword_matcher::{
    match_keywords, KeywordMatchConfig, KeywordMatchMode, KeywordMatchResult, SectionInput,
};
use crate::matching::keywords::KeywordExtractor;
use crate::matching::rank::{self, RankedCandidate, ResumeDocument};
use crate::matching::semantic::{rank_chunks, semantic_score, MatchChunk};
use crate::matching::suggestions::improvement_suggestions;
use crate::matching::MatchError;

pub const MIN_RESUME_CHARS: usize = crate::ingestion::pdf::MIN_RESUME_CHARS;
/// Raw job text as submitted.
pub const MIN_JOB_INPUT_CHARS: usize = 50;
/// Job text after cleaning.
pub const MIN_CLEANED_JOB_CHARS: usize = 20;
/// Chunks returned for a single interactive match.
pub const INTERACTIVE_TOP_K: usize = 5;

/// Everything produced by scoring one resume against one job.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub score: ScoreBreakdown,
    pub keywords: KeywordMatchResult,
    pub top_chunks: Vec<MatchChunk>,
    pub job_sections: JobSections,
    pub suggestions: Vec<String>,
}

/// Holds the shared, read-only collaborators. Cheap to clone.
#[derive(Clone)]
pub struct MatchPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    extractor: Arc<KeywordExtractor>,
    hybrid: HybridConfig,
    keywords: KeywordMatchConfig,
}

impl MatchPipeline {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, extractor: Arc<KeywordExtractor>) -> Self {
        Self {
            embedder,
            extractor,
            hybrid: HybridConfig::default(),
            keywords: KeywordMatchConfig::default(),
        }
    }

    pub fn with_hybrid_config(mut self, hybrid: HybridConfig) -> Self {
        self.hybrid = hybrid;
        self
    }

    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    pub fn hybrid_config(&self) -> &HybridConfig {
        &self.hybrid
    }

    /// `mode` selects how job skills are weighted; `Sectioned` is the default
    /// and degrades to the approximate split when the posting has no usable sections.
    pub async fn score(
        &self,
        resume_text: &str,
        job_text: &str,
        mode: KeywordMatchMode,
    ) -> Result<MatchOutcome, MatchError> {
        ensure_min_chars("resume", resume_text, MIN_RESUME_CHARS)?;
        ensure_min_chars("job", job_text, MIN_JOB_INPUT_CHARS)?;

        let job_sections = extract_sections(job_text);
        ensure_min_chars("cleaned job", &job_sections.cleaned_text, MIN_CLEANED_JOB_CHARS)?;

        let chunks = chunk_text(resume_text, ChunkingConfig::INTERACTIVE);
        let chunk_texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        debug!(
            "Chunked resume into {} windows (used_fallback={})",
            chunks.len(),
            job_sections.used_fallback
        );

        let chunk_embeddings = self.embedder.embed_batch(&chunk_texts).await?;
        let job_embedding = self.embedder.embed(&job_sections.cleaned_text).await?;

        let top_chunks = rank_chunks(&chunks, &chunk_embeddings, &job_embedding, INTERACTIVE_TOP_K)?;
        let semantic = semantic_score(&top_chunks);

        let resume_keywords = self.extractor.extract(resume_text);
        let job_keywords = self.extractor.extract(&job_sections.cleaned_text);
        let sections = match mode {
            KeywordMatchMode::Unweighted => SectionInput::None,
            KeywordMatchMode::Sectioned => SectionInput::Sections(&job_sections),
            KeywordMatchMode::ApproximateSplit => SectionInput::Unavailable,
        };
        let keywords = match_keywords(
            &self.extractor,
            &resume_keywords,
            &job_keywords,
            sections,
            &self.keywords,
        );

        let score = hybrid::score(semantic, &keywords, &self.hybrid);
        let suggestions = improvement_suggestions(&score.missing_skills, &score.matched_skills);

        info!(
            "Scored resume: hybrid={:.3} category={:?} semantic={:.3} technical={:.3}",
            score.hybrid_score, score.match_category, score.raw_semantic_score, score.technical_score
        );

        Ok(MatchOutcome {
            score,
            keywords,
            top_chunks,
            job_sections,
            suggestions,
        })
    }

    /// Ranks several resumes against one job. See [`rank::rank_resumes`].
    pub async fn rank(
        &self,
        job_text: &str,
        resumes: &[ResumeDocument],
        top_k: usize,
        top_n: usize,
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        ensure_min_chars("job", job_text, MIN_JOB_INPUT_CHARS)?;
        let job_sections = extract_sections(job_text);
        ensure_min_chars("cleaned job", &job_sections.cleaned_text, MIN_CLEANED_JOB_CHARS)?;
        for resume in resumes {
            ensure_min_chars("resume", &resume.text, MIN_RESUME_CHARS)?;
        }

        rank::rank_resumes(
            self.embedder.as_ref(),
            &job_sections.cleaned_text,
            resumes,
            top_k,
            top_n,
        )
        .await
    }
}

/// Counts characters of the trimmed text.
pub(crate) fn ensure_min_chars(
    document: &'static str,
    text: &str,
    min: usize,
) -> Result<(), MatchError> {
    let actual = text.trim().chars().count();
    if actual < min {
        return Err(MatchError::InputTooShort {
            document,
            min,
            actual,
        });
    }
    Ok(())
}
