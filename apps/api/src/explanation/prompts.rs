// Prompt template for match explanations.

use crate::explanation::{format_percent, ExplanationContext};

const JOB_EXCERPT_CHARS: usize = 1000;
const PROMPT_CHUNKS: usize = 3;
const PROMPT_SKILLS: usize = 10;

/// Explanation prompt. Replace `{job_excerpt}`, `{resume_sections}`, `{score}`,
/// `{matched}` and `{missing}` before sending.
pub const EXPLAIN_PROMPT_TEMPLATE: &str = "You are an expert technical recruiter analyzing a resume-job match.

JOB REQUIREMENTS:
{job_excerpt}

TOP MATCHING RESUME SECTIONS:
{resume_sections}

MATCH DATA:
- Overall Score: {score}
- Matched Skills: {matched}
- Missing Skills: {missing}

Provide a concise analysis in this EXACT format:

EXPLANATION:
[2-3 sentences explaining why this candidate matches or doesn't match]

STRENGTHS:
- [Key strength 1]
- [Key strength 2]
- [Key strength 3]

GAPS:
- [Gap 1]
- [Gap 2]

SUGGESTIONS:
- [Actionable suggestion 1]
- [Actionable suggestion 2]

Keep it professional, specific, and actionable.";

pub fn build_explain_prompt(context: &ExplanationContext<'_>) -> String {
    let job_excerpt: String = context.job_text.chars().take(JOB_EXCERPT_CHARS).collect();
    let resume_sections = context
        .top_chunks
        .iter()
        .take(PROMPT_CHUNKS)
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let score = format_percent(context.score.hybrid_score);
    let matched = skill_list(&context.score.matched_skills, "None found");
    let missing = skill_list(&context.score.missing_skills, "None");

    fill_template(
        EXPLAIN_PROMPT_TEMPLATE,
        &[
            ("job_excerpt", job_excerpt.as_str()),
            ("resume_sections", resume_sections.as_str()),
            ("score", score.as_str()),
            ("matched", matched.as_str()),
            ("missing", missing.as_str()),
        ],
    )
}

/// Single pass over `template`: substituted values are never rescanned, and
/// unknown `{...}` spans are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn skill_list(skills: &[String], empty: &str) -> String {
    if skills.is_empty() {
        return empty.to_string();
    }
    skills
        .iter()
        .take(PROMPT_SKILLS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
