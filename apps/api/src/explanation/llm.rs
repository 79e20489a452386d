//! `LlmExplainer`: hosted chat-model explanations.

use async_trait::async_trait;
use tracing::debug;

use crate::explanation::prompts::build_explain_prompt;
use crate::explanation::{Explainer, Explanation, ExplanationContext, ExplanationSource};
use crate::llm_client::{LlmClient, LlmError};

const MAX_STRENGTHS: usize = 3;
const MAX_GAPS: usize = 2;
const MAX_SUGGESTIONS: usize = 3;
/// Raw-text prefix used when the model omits the EXPLANATION section.
const RAW_EXPLANATION_CHARS: usize = 200;

pub struct LlmExplainer {
    client: LlmClient,
}

impl LlmExplainer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Explainer for LlmExplainer {
    async fn explain(&self, context: &ExplanationContext<'_>) -> Result<Explanation, LlmError> {
        let prompt = build_explain_prompt(context);
        debug!("Requesting explanation from {}", self.client.model());
        let raw = self.client.complete(&prompt).await?;
        Ok(parse_explanation(&raw))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Explanation,
    Strengths,
    Gaps,
    Suggestions,
}

/// Parses the EXPLANATION / STRENGTHS / GAPS / SUGGESTIONS layout.
/// Bullets start with `-` or `•`; unrecognised lines are ignored outside
/// the explanation section.
pub fn parse_explanation(raw: &str) -> Explanation {
    let mut explanation = String::new();
    let mut strengths = Vec::new();
    let mut gaps = Vec::new();
    let mut suggestions = Vec::new();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("EXPLANATION:") {
            current = Some(Section::Explanation);
            explanation = rest.trim().to_string();
        } else if line.starts_with("STRENGTHS:") {
            current = Some(Section::Strengths);
        } else if line.starts_with("GAPS:") {
            current = Some(Section::Gaps);
        } else if line.starts_with("SUGGESTIONS:") {
            current = Some(Section::Suggestions);
        } else if line.starts_with('-') || line.starts_with('•') {
            let item = line.trim_start_matches(['-', '•']).trim().to_string();
            match current {
                Some(Section::Strengths) => strengths.push(item),
                Some(Section::Gaps) => gaps.push(item),
                Some(Section::Suggestions) => suggestions.push(item),
                _ => {}
            }
        } else if current == Some(Section::Explanation) && !line.is_empty() {
            if !explanation.is_empty() {
                explanation.push(' ');
            }
            explanation.push_str(line);
        }
    }

    if explanation.is_empty() {
        explanation = raw.chars().take(RAW_EXPLANATION_CHARS).collect();
    }
    strengths.truncate(MAX_STRENGTHS);
    gaps.truncate(MAX_GAPS);
    suggestions.truncate(MAX_SUGGESTIONS);

    Explanation {
        explanation,
        strengths,
        gaps,
        suggestions,
        source: ExplanationSource::Llm,
        fallback_reason: None,
    }
}
