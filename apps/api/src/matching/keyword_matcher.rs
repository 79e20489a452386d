//! Keyword Matcher: set-overlap scoring of resume keywords against job keywords.
//!
//! Modes:
//! - `Unweighted`: one flat job skill list, technical = |R ∩ J| / |J|.
//! - `Sectioned`: skills re-extracted from the job's required / preferred text,
//!   technical = 0.80 × required + 0.20 × preferred, with a penalty when many
//!   required skills are missing.
//! - `ApproximateSplit`: sectioned scoring without usable sections; the flat
//!   job skill list (canonical order) is split 70/30 into required / preferred.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ingestion::job_sections::JobSections;
use crate::matching::keywords::{KeywordExtractor, KeywordSet};

/// Tunable constants of the keyword matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatchConfig {
    /// Technical score when the job lists no skills at all.
    pub neutral_technical_score: f64,
    pub education_match_score: f64,
    pub education_default_score: f64,
    pub experience_match_score: f64,
    pub experience_default_score: f64,
    pub required_weight: f64,
    pub preferred_weight: f64,
    pub empty_required_score: f64,
    pub empty_preferred_score: f64,
    /// More than this many missing required skills triggers the penalty.
    pub missing_required_tolerance: usize,
    pub missing_required_penalty: f64,
    /// Share of the flat skill list treated as required by the approximate split.
    pub approximate_required_share: f64,
}

impl Default for KeywordMatchConfig {
    fn default() -> Self {
        Self {
            neutral_technical_score: 0.5,
            education_match_score: 1.0,
            education_default_score: 0.5,
            experience_match_score: 1.0,
            experience_default_score: 0.7,
            required_weight: 0.80,
            preferred_weight: 0.20,
            empty_required_score: 0.8,
            empty_preferred_score: 1.0,
            missing_required_tolerance: 3,
            missing_required_penalty: 0.85,
            approximate_required_share: 0.70,
        }
    }
}

/// What section information the caller has for the job.
#[derive(Debug, Clone, Copy)]
pub enum SectionInput<'a> {
    /// Flat matching; no required/preferred weighting.
    None,
    /// Weighted matching using extracted job sections.
    Sections(&'a JobSections),
    /// Weighted matching requested but no structured sections available.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatchMode {
    Unweighted,
    Sectioned,
    ApproximateSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatchResult {
    pub mode: KeywordMatchMode,
    pub technical_score: f64,
    pub education_score: f64,
    pub experience_score: f64,
    /// Diagnostic only: 0.70 × technical + 0.20 × education + 0.10 × experience.
    pub overall_keyword_score: f64,
    pub required_score: Option<f64>,
    pub preferred_score: Option<f64>,
    pub required_penalty_applied: bool,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub missing_required: Vec<String>,
    pub missing_preferred: Vec<String>,
}

/// Scores resume keywords against job keywords.
pub fn match_keywords(
    extractor: &KeywordExtractor,
    resume: &KeywordSet,
    job: &KeywordSet,
    sections: SectionInput<'_>,
    config: &KeywordMatchConfig,
) -> KeywordMatchResult {
    let education_score = category_score(
        &resume.education,
        &job.education,
        config.education_match_score,
        config.education_default_score,
    );
    let experience_score = category_score(
        &resume.experience_level,
        &job.experience_level,
        config.experience_match_score,
        config.experience_default_score,
    );

    let split = match sections {
        SectionInput::None => None,
        SectionInput::Sections(sections) => {
            let split = sectioned_skills(extractor, sections);
            if split.required.is_empty()
                && split.preferred.is_empty()
                && !job.technical_skills.is_empty()
            {
                Some(approximate_split(&job.technical_skills, config))
            } else {
                Some(split)
            }
        }
        SectionInput::Unavailable => Some(approximate_split(&job.technical_skills, config)),
    };

    let technical = match split {
        None => unweighted_technical(&resume.technical_skills, &job.technical_skills, config),
        Some(split) => {
            weighted_technical(&resume.technical_skills, &job.technical_skills, split, config)
        }
    };

    let overall_keyword_score =
        0.70 * technical.score + 0.20 * education_score + 0.10 * experience_score;

    KeywordMatchResult {
        mode: technical.mode,
        technical_score: technical.score,
        education_score,
        experience_score,
        overall_keyword_score,
        required_score: technical.required_score,
        preferred_score: technical.preferred_score,
        required_penalty_applied: technical.penalty_applied,
        matched_skills: technical.matched,
        missing_skills: technical.missing,
        missing_required: technical.missing_required,
        missing_preferred: technical.missing_preferred,
    }
}

struct SkillSplit {
    required: BTreeSet<String>,
    preferred: BTreeSet<String>,
    mode: KeywordMatchMode,
}

struct TechnicalOutcome {
    mode: KeywordMatchMode,
    score: f64,
    required_score: Option<f64>,
    preferred_score: Option<f64>,
    penalty_applied: bool,
    matched: Vec<String>,
    missing: Vec<String>,
    missing_required: Vec<String>,
    missing_preferred: Vec<String>,
}

fn category_score(
    resume: &BTreeSet<String>,
    job: &BTreeSet<String>,
    matched: f64,
    default: f64,
) -> f64 {
    if resume.intersection(job).next().is_some() {
        matched
    } else {
        default
    }
}

/// Skills named in both sections count as required only.
fn sectioned_skills(extractor: &KeywordExtractor, sections: &JobSections) -> SkillSplit {
    let required = extractor.extract_skills(&sections.required_text);
    let preferred = extractor
        .extract_skills(&sections.preferred_text)
        .difference(&required)
        .cloned()
        .collect();
    SkillSplit {
        required,
        preferred,
        mode: KeywordMatchMode::Sectioned,
    }
}

/// First ceil(70%) of the skills in canonical (lexicographic) order are required.
fn approximate_split(job_skills: &BTreeSet<String>, config: &KeywordMatchConfig) -> SkillSplit {
    let required_count =
        (job_skills.len() as f64 * config.approximate_required_share - 1e-9).ceil() as usize;
    let required = job_skills.iter().take(required_count).cloned().collect();
    let preferred = job_skills.iter().skip(required_count).cloned().collect();
    SkillSplit {
        required,
        preferred,
        mode: KeywordMatchMode::ApproximateSplit,
    }
}

fn unweighted_technical(
    resume: &BTreeSet<String>,
    job: &BTreeSet<String>,
    config: &KeywordMatchConfig,
) -> TechnicalOutcome {
    let (score, matched, missing) = if job.is_empty() {
        (config.neutral_technical_score, Vec::new(), Vec::new())
    } else {
        let matched: Vec<String> = resume.intersection(job).cloned().collect();
        let missing: Vec<String> = job.difference(resume).cloned().collect();
        (matched.len() as f64 / job.len() as f64, matched, missing)
    };

    TechnicalOutcome {
        mode: KeywordMatchMode::Unweighted,
        score,
        required_score: None,
        preferred_score: None,
        penalty_applied: false,
        matched,
        missing,
        missing_required: Vec::new(),
        missing_preferred: Vec::new(),
    }
}

fn weighted_technical(
    resume: &BTreeSet<String>,
    job: &BTreeSet<String>,
    split: SkillSplit,
    config: &KeywordMatchConfig,
) -> TechnicalOutcome {
    let required_score = coverage(resume, &split.required, config.empty_required_score);
    let preferred_score = coverage(resume, &split.preferred, config.empty_preferred_score);

    let missing_required: Vec<String> = split.required.difference(resume).cloned().collect();
    let missing_preferred: Vec<String> = split.preferred.difference(resume).cloned().collect();

    let mut score =
        config.required_weight * required_score + config.preferred_weight * preferred_score;
    let penalty_applied = missing_required.len() > config.missing_required_tolerance;
    if penalty_applied {
        score *= config.missing_required_penalty;
    }

    let all_job_skills: BTreeSet<&String> = job
        .iter()
        .chain(split.required.iter())
        .chain(split.preferred.iter())
        .collect();
    // matched and missing partition the same skill universe
    let (matched, missing): (Vec<&String>, Vec<&String>) =
        all_job_skills.into_iter().partition(|s| resume.contains(*s));

    TechnicalOutcome {
        mode: split.mode,
        score,
        required_score: Some(required_score),
        preferred_score: Some(preferred_score),
        penalty_applied,
        matched: matched.into_iter().cloned().collect(),
        missing: missing.into_iter().cloned().collect(),
        missing_required,
        missing_preferred,
    }
}

fn coverage(resume: &BTreeSet<String>, wanted: &BTreeSet<String>, empty_default: f64) -> f64 {
    if wanted.is_empty() {
        return empty_default;
    }
    wanted.intersection(resume).count() as f64 / wanted.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::job_sections::extract_sections;
    use crate::matching::vocabulary::Vocabulary;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&Vocabulary::builtin().unwrap()).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn keywords(skills: &[&str], education: &[&str], experience: &[&str]) -> KeywordSet {
        KeywordSet {
            technical_skills: set(skills),
            education: set(education),
            experience_level: set(experience),
        }
    }

    fn sections(required: &str, preferred: &str) -> JobSections {
        JobSections {
            required_text: required.to_string(),
            preferred_text: preferred.to_string(),
            cleaned_text: format!("{required}\n{preferred}"),
            full_text: format!("{required}\n{preferred}"),
            used_fallback: false,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_unweighted_overlap_ratio() {
        let resume = keywords(&["python", "sql"], &[], &[]);
        let job = keywords(&["python", "sql", "spark", "kafka"], &[], &[]);
        let result = match_keywords(
            &extractor(),
            &resume,
            &job,
            SectionInput::None,
            &KeywordMatchConfig::default(),
        );
        assert_eq!(result.mode, KeywordMatchMode::Unweighted);
        assert!(approx(result.technical_score, 0.5));
        assert_eq!(result.matched_skills, vec!["python", "sql"]);
        assert_eq!(result.missing_skills, vec!["kafka", "spark"]);
        assert!(result.missing_required.is_empty());
    }

    #[test]
    fn test_unweighted_empty_job_skills_is_neutral() {
        let resume = keywords(&["python"], &[], &[]);
        let job = KeywordSet::default();
        let result = match_keywords(
            &extractor(),
            &resume,
            &job,
            SectionInput::None,
            &KeywordMatchConfig::default(),
        );
        assert!(approx(result.technical_score, 0.5));
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_education_and_experience_defaults() {
        let config = KeywordMatchConfig::default();
        let matched = match_keywords(
            &extractor(),
            &keywords(&[], &["phd"], &["senior"]),
            &keywords(&[], &["phd", "masters"], &["senior"]),
            SectionInput::None,
            &config,
        );
        assert!(approx(matched.education_score, 1.0));
        assert!(approx(matched.experience_score, 1.0));

        let unmatched = match_keywords(
            &extractor(),
            &keywords(&[], &["bachelor"], &[]),
            &keywords(&[], &["phd"], &["senior"]),
            SectionInput::None,
            &config,
        );
        assert!(approx(unmatched.education_score, 0.5));
        assert!(approx(unmatched.experience_score, 0.7));
    }

    #[test]
    fn test_overall_keyword_score_weights() {
        let result = match_keywords(
            &extractor(),
            &keywords(&["python"], &["phd"], &[]),
            &keywords(&["python", "sql"], &["phd"], &["senior"]),
            SectionInput::None,
            &KeywordMatchConfig::default(),
        );
        // 0.70*0.5 + 0.20*1.0 + 0.10*0.7
        assert!(approx(result.overall_keyword_score, 0.35 + 0.20 + 0.07));
    }

    #[test]
    fn test_sectioned_weights_required_and_preferred() {
        let job_sections = sections("Required: Python, SQL", "Preferred: Docker, Kubernetes");
        let resume = keywords(&["python", "sql", "docker"], &[], &[]);
        let job = keywords(&["python", "sql", "docker", "kubernetes"], &[], &[]);
        let result = match_keywords(
            &extractor(),
            &resume,
            &job,
            SectionInput::Sections(&job_sections),
            &KeywordMatchConfig::default(),
        );
        assert_eq!(result.mode, KeywordMatchMode::Sectioned);
        assert!(approx(result.required_score.unwrap(), 1.0));
        assert!(approx(result.preferred_score.unwrap(), 0.5));
        assert!(approx(result.technical_score, 0.80 + 0.10));
        assert!(result.missing_required.is_empty());
        assert_eq!(result.missing_preferred, vec!["kubernetes"]);
        assert_eq!(result.matched_skills, vec!["docker", "python", "sql"]);
    }

    #[test]
    fn test_required_penalty_applies_when_more_than_three_missing() {
        let job_sections = sections("Must have: Python, SQL, Spark, Kafka, Airflow", "");
        let resume = keywords(&["python"], &[], &[]);
        let job = keywords(&["python", "sql", "spark", "kafka", "airflow"], &[], &[]);
        let result = match_keywords(
            &extractor(),
            &resume,
            &job,
            SectionInput::Sections(&job_sections),
            &KeywordMatchConfig::default(),
        );
        let unpenalized = 0.80 * (1.0 / 5.0) + 0.20 * 1.0;
        assert!(result.required_penalty_applied);
        assert_eq!(result.missing_required.len(), 4);
        assert!(approx(result.technical_score, unpenalized * 0.85));
    }

    #[test]
    fn test_no_penalty_with_three_missing() {
        let job_sections = sections("Must have: Python, SQL, Spark, Kafka", "");
        let resume = keywords(&["python"], &[], &[]);
        let job = keywords(&["python", "sql", "spark", "kafka"], &[], &[]);
        let result = match_keywords(
            &extractor(),
            &resume,
            &job,
            SectionInput::Sections(&job_sections),
            &KeywordMatchConfig::default(),
        );
        assert!(!result.required_penalty_applied);
        assert!(approx(result.technical_score, 0.80 * 0.25 + 0.20));
    }

    #[test]
    fn test_empty_sections_use_defaults_when_job_has_no_skills() {
        let job_sections = sections("", "");
        let result = match_keywords(
            &extractor(),
            &keywords(&["python"], &[], &[]),
            &KeywordSet::default(),
            SectionInput::Sections(&job_sections),
            &KeywordMatchConfig::default(),
        );
        assert_eq!(result.mode, KeywordMatchMode::Sectioned);
        assert!(approx(result.required_score.unwrap(), 0.8));
        assert!(approx(result.preferred_score.unwrap(), 1.0));
        assert!(approx(result.technical_score, 0.84));
    }

    #[test]
    fn test_sections_without_skills_fall_back_to_approximate_split() {
        let job_sections = sections("", "");
        let job = keywords(&["aws", "docker", "python"], &[], &[]);
        let result = match_keywords(
            &extractor(),
            &keywords(&["python"], &[], &[]),
            &job,
            SectionInput::Sections(&job_sections),
            &KeywordMatchConfig::default(),
        );
        assert_eq!(result.mode, KeywordMatchMode::ApproximateSplit);
        // ceil(3 * 0.7) = 3 → everything is required
        assert_eq!(result.missing_required, vec!["aws", "docker"]);
        assert!(result.missing_preferred.is_empty());
    }

    #[test]
    fn test_approximate_split_seventy_thirty() {
        let job = keywords(
            &["a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9", "b0"],
            &[],
            &[],
        );
        let result = match_keywords(
            &extractor(),
            &keywords(&["b0"], &[], &[]),
            &job,
            SectionInput::Unavailable,
            &KeywordMatchConfig::default(),
        );
        assert_eq!(result.mode, KeywordMatchMode::ApproximateSplit);
        assert_eq!(result.missing_required.len(), 7);
        assert_eq!(result.missing_preferred, vec!["a8", "a9"]);
        assert!(approx(result.preferred_score.unwrap(), 1.0 / 3.0));
    }

    #[test]
    fn test_skill_in_both_sections_counts_as_required() {
        let job_sections = sections("Required: Python", "Preferred: Python, Docker");
        let result = match_keywords(
            &extractor(),
            &KeywordSet::default(),
            &keywords(&["python", "docker"], &[], &[]),
            SectionInput::Sections(&job_sections),
            &KeywordMatchConfig::default(),
        );
        assert_eq!(result.missing_required, vec!["python"]);
        assert_eq!(result.missing_preferred, vec!["docker"]);
        assert_eq!(result.missing_skills, vec!["docker", "python"]);
    }

    #[test]
    fn test_general_section_skills_are_reported_both_ways() {
        let ex = extractor();
        let jd = extract_sections(
            "Key Responsibilities\nBuild streaming jobs with Spark and Kafka.\nRequired qualifications\nPython and SQL\n",
        );
        let job = ex.extract(&jd.cleaned_text);
        let resume = ex.extract("Python SQL Spark engineer");
        let result = match_keywords(
            &ex,
            &resume,
            &job,
            SectionInput::Sections(&jd),
            &KeywordMatchConfig::default(),
        );

        assert_eq!(result.matched_skills, vec!["python", "spark", "sql"]);
        assert_eq!(result.missing_skills, vec!["kafka"]);
        let reported = result.matched_skills.len() + result.missing_skills.len();
        let universe: BTreeSet<&String> = job
            .technical_skills
            .iter()
            .chain(result.missing_required.iter())
            .collect();
        assert_eq!(reported, universe.len());
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let ex = extractor();
        let config = KeywordMatchConfig::default();
        let resumes = [
            keywords(&[], &[], &[]),
            keywords(&["python"], &[], &[]),
            keywords(&["python", "sql", "spark", "kafka", "docker", "aws"], &[], &[]),
        ];
        let jd = extract_sections(
            "Required qualifications\nPython, SQL, Spark, Kafka, Airflow, Scala\nNice to have\nDocker, AWS\n",
        );
        let job = ex.extract(&jd.cleaned_text);
        for resume in &resumes {
            for input in [
                SectionInput::None,
                SectionInput::Sections(&jd),
                SectionInput::Unavailable,
            ] {
                let r = match_keywords(&ex, resume, &job, input, &config);
                assert!((0.0..=1.0).contains(&r.technical_score));
                if let Some(s) = r.required_score {
                    assert!((0.0..=1.0).contains(&s));
                }
                if let Some(s) = r.preferred_score {
                    assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }
}
