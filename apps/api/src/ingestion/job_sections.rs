//! Job posting cleaner: keeps requirement-like lines, drops company fluff,
//! and routes lines into required vs preferred buckets.
//!
//! Marker matching is substring-based on the trimmed, lowercased line.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lines containing any of these switch skipping off and re-evaluate the section.
const RELEVANT_SECTION_MARKERS: &[&str] = &[
    "responsibilities",
    "requirements",
    "qualifications",
    "required",
    "preferred",
    "skills",
    "experience",
    "education",
    "what you'll do",
    "what you will do",
    "what you need",
    "you will",
    "must have",
    "should have",
    "nice to have",
    "technical skills",
    "key responsibilities",
];

/// Lines containing any of these start a skipped region.
const IRRELEVANT_SECTION_MARKERS: &[&str] = &[
    "about us",
    "company overview",
    "who we are",
    "our mission",
    "our values",
    "benefits",
    "compensation",
    "salary",
    "perks",
    "what we offer",
    "equal opportunity",
    "eeo",
    "diversity",
    "application process",
    "how to apply",
    "contact",
    "location details",
];

const REQUIRED_MARKERS: &[&str] = &["required", "must have", "qualifications"];
const PREFERRED_MARKERS: &[&str] = &["preferred", "nice to have", "bonus"];

/// Cleaned text shorter than this triggers the middle-slice fallback.
pub const MIN_CLEANED_CHARS: usize = 100;
/// Below this many non-empty lines the fallback returns the text unmodified.
pub const MIN_FALLBACK_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Required,
    Preferred,
    General,
}

/// Derived view of a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSections {
    pub required_text: String,
    pub preferred_text: String,
    pub cleaned_text: String,
    pub full_text: String,
    /// True when the marker heuristic produced too little and the middle slice was used.
    pub used_fallback: bool,
}

impl JobSections {
    pub fn has_structured_sections(&self) -> bool {
        !self.required_text.trim().is_empty() || !self.preferred_text.trim().is_empty()
    }
}

/// Splits a raw posting into cleaned, required and preferred text.
pub fn extract_sections(job_text: &str) -> JobSections {
    let mut relevant = Vec::new();
    let mut required = Vec::new();
    let mut preferred = Vec::new();

    let mut current: Option<SectionKind> = None;
    let mut skip = false;

    for line in job_text.lines() {
        let lower = line.trim().to_lowercase();

        if contains_any(&lower, IRRELEVANT_SECTION_MARKERS) {
            skip = true;
            continue;
        }

        if contains_any(&lower, RELEVANT_SECTION_MARKERS) {
            skip = false;
            current = Some(classify_header(&lower));
        }

        if skip || line.trim().is_empty() {
            continue;
        }

        relevant.push(line);
        match current {
            Some(SectionKind::Required) => required.push(line),
            Some(SectionKind::Preferred) => preferred.push(line),
            _ => {}
        }
    }

    let mut cleaned_text = relevant.join("\n");
    let mut used_fallback = false;

    if cleaned_text.chars().count() < MIN_CLEANED_CHARS {
        debug!(
            cleaned_chars = cleaned_text.chars().count(),
            "section markers matched too little, using middle slice"
        );
        cleaned_text = extract_middle_section(job_text);
        used_fallback = true;
    }

    JobSections {
        required_text: required.join("\n"),
        preferred_text: preferred.join("\n"),
        cleaned_text,
        full_text: job_text.to_string(),
        used_fallback,
    }
}

/// Middle 60% of non-empty lines; short postings are returned as-is.
pub fn extract_middle_section(text: &str) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    if lines.len() < MIN_FALLBACK_LINES {
        return text.to_string();
    }

    let margin = lines.len() / 5;
    lines[margin..lines.len() - margin].join("\n")
}

fn classify_header(lower: &str) -> SectionKind {
    if contains_any(lower, REQUIRED_MARKERS) {
        SectionKind::Required
    } else if contains_any(lower, PREFERRED_MARKERS) {
        SectionKind::Preferred
    } else {
        SectionKind::General
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
