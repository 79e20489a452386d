use std::collections::{BTreeSet, HashSet};

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::explanation::{explain_or_fallback, Explanation, ExplanationContext};
use crate::ingestion::job_sections::{extract_sections, JobSections};
use crate::ingestion::pdf::extract_text_from_pdf;
use crate::matching::hybrid::ScoreBreakdown;
use crate::matching::keyword_matcher::{KeywordMatchMode, KeywordMatchResult};
use crate::matching::keywords::KeywordSet;
use crate::matching::pipeline::MatchOutcome;
use crate::matching::rank::{RankedCandidate, ResumeDocument, DEFAULT_RANK_TOP_K, DEFAULT_RANK_TOP_N};
use crate::matching::semantic::MatchChunk;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_text: String,
    #[serde(default)]
    pub explain: bool,
    /// Defaults to section-weighted matching.
    #[serde(default)]
    pub keyword_mode: Option<KeywordMatchMode>,
}

/// How the job posting was reduced before matching.
#[derive(Debug, Serialize)]
pub struct JobCleaningSummary {
    pub original_chars: usize,
    pub cleaned_chars: usize,
    pub used_fallback: bool,
    pub has_structured_sections: bool,
}

impl From<&JobSections> for JobCleaningSummary {
    fn from(sections: &JobSections) -> Self {
        Self {
            original_chars: sections.full_text.chars().count(),
            cleaned_chars: sections.cleaned_text.chars().count(),
            used_fallback: sections.used_fallback,
            has_structured_sections: sections.has_structured_sections(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub request_id: Uuid,
    pub scored_at: DateTime<Utc>,
    pub score: ScoreBreakdown,
    pub keyword_details: KeywordMatchResult,
    pub top_chunks: Vec<MatchChunk>,
    pub job_cleaning: JobCleaningSummary,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

#[derive(Debug, Deserialize)]
pub struct JobTextRequest {
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct JobSectionsResponse {
    pub sections: JobSections,
    pub keywords: KeywordSet,
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub vocabulary_version: String,
    pub keywords: KeywordSet,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_text: String,
    pub resumes: Vec<ResumeDocument>,
    pub top_k: Option<usize>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub request_id: Uuid,
    pub ranked_at: DateTime<Utc>,
    pub candidates: Vec<RankedCandidate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let mode = req.keyword_mode.unwrap_or(KeywordMatchMode::Sectioned);
    let response = run_match(&state, &req.resume_text, &req.job_text, mode, req.explain).await?;
    Ok(Json(response))
}

/// POST /api/v1/match/upload
///
/// Multipart fields: `resume` (PDF file), `job_text`, optional `explain`.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let mut pdf_bytes = None;
    let mut job_text = None;
    let mut explain = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                pdf_bytes = Some(bytes.to_vec());
            }
            Some("job_text") => {
                job_text = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read job_text: {e}"))
                })?);
            }
            Some("explain") => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read explain: {e}"))
                })?;
                explain = matches!(value.trim(), "true" | "1" | "yes");
            }
            _ => {}
        }
    }

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("Missing 'resume' file field".to_string()))?;
    let job_text =
        job_text.ok_or_else(|| AppError::Validation("Missing 'job_text' field".to_string()))?;

    let resume_text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let response = run_match(
        &state,
        &resume_text,
        &job_text,
        KeywordMatchMode::Sectioned,
        explain,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/jobs/sections
pub async fn handle_job_sections(
    State(state): State<AppState>,
    Json(req): Json<JobTextRequest>,
) -> Result<Json<JobSectionsResponse>, AppError> {
    if req.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text must not be empty".to_string()));
    }

    let sections = extract_sections(&req.job_text);
    let extractor = state.pipeline.extractor();
    let keywords = extractor.extract(&sections.cleaned_text);
    let required_skills = extractor.extract_skills(&sections.required_text);
    let preferred_skills = extractor
        .extract_skills(&sections.preferred_text)
        .difference(&required_skills)
        .cloned()
        .collect();

    Ok(Json(JobSectionsResponse {
        sections,
        keywords,
        required_skills,
        preferred_skills,
    }))
}

/// POST /api/v1/keywords
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(req): Json<KeywordsRequest>,
) -> Json<KeywordsResponse> {
    let extractor = state.pipeline.extractor();
    Json(KeywordsResponse {
        vocabulary_version: extractor.vocabulary_version().to_string(),
        keywords: extractor.extract(&req.text),
    })
}

/// POST /api/v1/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    if req.resumes.is_empty() {
        return Err(AppError::Validation("resumes must not be empty".to_string()));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = req.resumes.iter().find(|r| !seen.insert(r.resume_id.as_str())) {
        return Err(AppError::Validation(format!(
            "duplicate resume_id '{}'",
            dup.resume_id
        )));
    }

    let top_k = req.top_k.unwrap_or(DEFAULT_RANK_TOP_K);
    let top_n = req.top_n.unwrap_or(DEFAULT_RANK_TOP_N);
    if top_k == 0 || top_n == 0 {
        return Err(AppError::Validation("top_k and top_n must be positive".to_string()));
    }

    let candidates = state
        .pipeline
        .rank(&req.job_text, &req.resumes, top_k, top_n)
        .await?;
    info!(
        "Ranked {} resumes, returning {}",
        req.resumes.len(),
        candidates.len()
    );

    Ok(Json(RankResponse {
        request_id: Uuid::new_v4(),
        ranked_at: Utc::now(),
        candidates,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared
// ────────────────────────────────────────────────────────────────────────────

async fn run_match(
    state: &AppState,
    resume_text: &str,
    job_text: &str,
    mode: KeywordMatchMode,
    explain: bool,
) -> Result<MatchResponse, AppError> {
    let MatchOutcome {
        score,
        keywords,
        top_chunks,
        job_sections,
        suggestions,
    } = state.pipeline.score(resume_text, job_text, mode).await?;

    let explanation = if explain {
        let context = ExplanationContext {
            job_text: &job_sections.cleaned_text,
            top_chunks: &top_chunks,
            score: &score,
        };
        Some(explain_or_fallback(state.explainer.as_deref(), &context).await)
    } else {
        None
    };

    Ok(MatchResponse {
        request_id: Uuid::new_v4(),
        scored_at: Utc::now(),
        job_cleaning: JobCleaningSummary::from(&job_sections),
        score,
        keyword_details: keywords,
        top_chunks,
        suggestions,
        explanation,
    })
}
