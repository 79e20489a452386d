//! Explanation Generator: turns a score breakdown into recruiter-facing prose.
//!
//! Default: `fallback_explanation` (local, deterministic, always available).
//! Optional: `LlmExplainer` (hosted chat model), enabled when an API key is set.
//!
//! `AppState` holds an `Option<Arc<dyn Explainer>>`. A failed LLM call is never
//! hidden: the caller receives the fallback marked `source: "fallback"` with
//! the failure reason.

pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::LlmError;
use crate::matching::hybrid::ScoreBreakdown;
use crate::matching::semantic::MatchChunk;

pub use llm::LlmExplainer;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub suggestions: Vec<String>,
    pub source: ExplanationSource,
    /// Why the fallback was used, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Inputs an explainer may draw on.
pub struct ExplanationContext<'a> {
    pub job_text: &'a str,
    pub top_chunks: &'a [MatchChunk],
    pub score: &'a ScoreBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap explanation backends without touching handlers.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, context: &ExplanationContext<'_>) -> Result<Explanation, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback
// ────────────────────────────────────────────────────────────────────────────

const MAX_LISTED_GAPS: usize = 5;

/// Deterministic explanation built from skill counts alone.
pub fn fallback_explanation(score: &ScoreBreakdown) -> Explanation {
    let matched = &score.matched_skills;
    let missing = &score.missing_skills;

    let first_strength = if matched.is_empty() {
        "Some relevant experience found".to_string()
    } else {
        format!("Matches {} required skills", matched.len())
    };

    let first_gap = if missing.is_empty() {
        "Some skills need verification".to_string()
    } else {
        let listed: Vec<&str> = missing.iter().take(MAX_LISTED_GAPS).map(String::as_str).collect();
        format!("Missing {} key skills: {}", missing.len(), listed.join(", "))
    };

    Explanation {
        explanation: format!(
            "This candidate has a {} match based on semantic analysis and keyword matching.",
            format_percent(score.display_score())
        ),
        strengths: vec![
            first_strength,
            "Resume structure is clear and readable".to_string(),
            "Technical background is relevant".to_string(),
        ],
        gaps: vec![
            first_gap,
            "Consider adding more specific technical details".to_string(),
        ],
        suggestions: vec![
            "Highlight specific tools and technologies used".to_string(),
            "Quantify achievements with numbers and metrics".to_string(),
            "Add relevant certifications if available".to_string(),
        ],
        source: ExplanationSource::Fallback,
        fallback_reason: None,
    }
}

/// Uses `explainer` when present; otherwise, or on failure, the fallback with a reason.
pub async fn explain_or_fallback(
    explainer: Option<&dyn Explainer>,
    context: &ExplanationContext<'_>,
) -> Explanation {
    let Some(explainer) = explainer else {
        return Explanation {
            fallback_reason: Some("LLM explanations are not configured".to_string()),
            ..fallback_explanation(context.score)
        };
    };

    match explainer.explain(context).await {
        Ok(explanation) => explanation,
        Err(e) => {
            warn!("LLM explanation failed, using fallback: {e}");
            Explanation {
                fallback_reason: Some(format!("LLM explanation failed: {e}")),
                ..fallback_explanation(context.score)
            }
        }
    }
}

/// `0.7` → `"70.0%"`.
pub(crate) fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
