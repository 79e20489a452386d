//! Hybrid Scorer: fuses the semantic score and keyword sub-scores into one
//! match score, category and recommendation.
//!
//! Formula:
//!   boosted = min(semantic × boost, 1.0)
//!   hybrid  = 0.40·technical + 0.30·boosted + 0.20·experience + 0.10·education
//!   +bonus once when boosted > 0.4 and technical < 0.5 (adjacent-discipline fit)
//!
//! `hybrid_score` is not clamped and may exceed 1.0; clamp for display only.

use serde::{Deserialize, Serialize};

use crate::matching::keyword_matcher::{KeywordMatchMode, KeywordMatchResult};

/// Sentence-embedding cosine scores are conservative; this rescales them.
pub const DEFAULT_SEMANTIC_BOOST: f64 = 1.8;
pub const DEFAULT_CROSS_DOMAIN_BONUS: f64 = 0.05;

/// Category boundaries are inclusive; this absorbs float noise at the boundary.
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    pub technical: f64,
    pub semantic: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            technical: 0.40,
            semantic: 0.30,
            experience: 0.20,
            education: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    pub weights: HybridWeights,
    pub semantic_boost: f64,
    pub cross_domain_bonus: f64,
    /// Bonus requires boosted semantic strictly above this.
    pub cross_domain_semantic_min: f64,
    /// Bonus requires technical strictly below this.
    pub cross_domain_technical_max: f64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            weights: HybridWeights::default(),
            semantic_boost: DEFAULT_SEMANTIC_BOOST,
            cross_domain_bonus: DEFAULT_CROSS_DOMAIN_BONUS,
            cross_domain_semantic_min: 0.4,
            cross_domain_technical_max: 0.5,
        }
    }
}

/// Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl MatchCategory {
    pub fn from_score(score: f64) -> Self {
        let at_least = |threshold: f64| score + SCORE_EPSILON >= threshold;
        if at_least(0.70) {
            MatchCategory::Excellent
        } else if at_least(0.55) {
            MatchCategory::Good
        } else if at_least(0.40) {
            MatchCategory::Moderate
        } else {
            MatchCategory::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchCategory::Excellent => "Excellent Match",
            MatchCategory::Good => "Good Match",
            MatchCategory::Moderate => "Moderate Match",
            MatchCategory::Low => "Low Match",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MatchCategory::Excellent => "🔥",
            MatchCategory::Good => "✅",
            MatchCategory::Moderate => "⚠️",
            MatchCategory::Low => "❌",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            MatchCategory::Excellent => "Strong candidate - Recommend immediate interview",
            MatchCategory::Good => "Solid candidate - Review in detail",
            MatchCategory::Moderate => "Some gaps exist - Consider with reservations",
            MatchCategory::Low => "Significant gaps - May not be suitable",
        }
    }
}

/// Terminal artifact of one scoring request. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub hybrid_score: f64,
    /// Boosted semantic score actually used in the fusion.
    pub semantic_score: f64,
    pub raw_semantic_score: f64,
    pub technical_score: f64,
    pub education_score: f64,
    pub experience_score: f64,
    pub match_category: MatchCategory,
    pub match_label: String,
    pub match_icon: String,
    pub recommendation: String,
    pub cross_domain_bonus_applied: bool,
    pub keyword_mode: KeywordMatchMode,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub missing_required: Vec<String>,
    pub missing_preferred: Vec<String>,
}

impl ScoreBreakdown {
    /// `hybrid_score` clamped to [0, 1] for presentation.
    pub fn display_score(&self) -> f64 {
        self.hybrid_score.clamp(0.0, 1.0)
    }
}

/// Fuses the semantic score with keyword results. Pure function of its inputs.
pub fn score(
    semantic_score: f64,
    keywords: &KeywordMatchResult,
    config: &HybridConfig,
) -> ScoreBreakdown {
    let boosted = (semantic_score * config.semantic_boost).min(1.0);
    let w = &config.weights;

    let mut hybrid = w.technical * keywords.technical_score
        + w.semantic * boosted
        + w.experience * keywords.experience_score
        + w.education * keywords.education_score;

    let cross_domain = boosted > config.cross_domain_semantic_min
        && keywords.technical_score < config.cross_domain_technical_max;
    if cross_domain {
        hybrid += config.cross_domain_bonus;
    }

    let category = MatchCategory::from_score(hybrid);

    ScoreBreakdown {
        hybrid_score: hybrid,
        semantic_score: boosted,
        raw_semantic_score: semantic_score,
        technical_score: keywords.technical_score,
        education_score: keywords.education_score,
        experience_score: keywords.experience_score,
        match_category: category,
        match_label: category.label().to_string(),
        match_icon: category.icon().to_string(),
        recommendation: category.recommendation().to_string(),
        cross_domain_bonus_applied: cross_domain,
        keyword_mode: keywords.mode,
        matched_skills: keywords.matched_skills.clone(),
        missing_skills: keywords.missing_skills.clone(),
        missing_required: keywords.missing_required.clone(),
        missing_preferred: keywords.missing_preferred.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(technical: f64, experience: f64, education: f64) -> KeywordMatchResult {
        KeywordMatchResult {
            mode: KeywordMatchMode::Sectioned,
            technical_score: technical,
            education_score: education,
            experience_score: experience,
            overall_keyword_score: 0.0,
            required_score: None,
            preferred_score: None,
            required_penalty_applied: false,
            matched_skills: vec!["python".to_string()],
            missing_skills: vec!["spark".to_string()],
            missing_required: vec!["spark".to_string()],
            missing_preferred: vec![],
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = HybridWeights::default();
        assert!((w.technical + w.semantic + w.experience + w.education - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fusion_reaches_excellent_boundary() {
        let breakdown = score(0.5, &keywords(0.6, 0.7, 0.5), &HybridConfig::default());
        assert!((breakdown.semantic_score - 0.9).abs() < 1e-9);
        assert!((breakdown.raw_semantic_score - 0.5).abs() < 1e-9);
        assert!((breakdown.hybrid_score - 0.70).abs() < 1e-9);
        assert!(!breakdown.cross_domain_bonus_applied);
        assert_eq!(breakdown.match_category, MatchCategory::Excellent);
        assert_eq!(breakdown.match_label, "Excellent Match");
    }

    #[test]
    fn test_boost_is_capped_at_one() {
        let breakdown = score(0.8, &keywords(1.0, 1.0, 1.0), &HybridConfig::default());
        assert_eq!(breakdown.semantic_score, 1.0);
        assert!((breakdown.hybrid_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_domain_bonus_applied_once() {
        let (e, d) = (0.7, 0.5);
        let breakdown = score(0.3, &keywords(0.3, e, d), &HybridConfig::default());
        let base = 0.40 * 0.3 + 0.30 * 0.54 + 0.20 * e + 0.10 * d;
        assert!(breakdown.cross_domain_bonus_applied);
        assert!((breakdown.hybrid_score - (base + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn test_no_bonus_when_semantic_not_above_threshold() {
        // boosted = 0.36
        let breakdown = score(0.2, &keywords(0.3, 0.7, 0.5), &HybridConfig::default());
        assert!(!breakdown.cross_domain_bonus_applied);
    }

    #[test]
    fn test_bonus_can_push_score_above_one() {
        let config = HybridConfig {
            cross_domain_bonus: 0.5,
            ..HybridConfig::default()
        };
        let breakdown = score(1.0, &keywords(0.49, 1.0, 1.0), &config);
        assert!(breakdown.hybrid_score > 1.0);
        assert_eq!(breakdown.display_score(), 1.0);
    }

    #[test]
    fn test_boost_is_configurable() {
        let config = HybridConfig {
            semantic_boost: 1.0,
            ..HybridConfig::default()
        };
        let breakdown = score(0.5, &keywords(0.6, 0.7, 0.5), &config);
        assert!((breakdown.semantic_score - 0.5).abs() < 1e-9);
        assert_eq!(breakdown.match_category, MatchCategory::Good);
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(MatchCategory::from_score(0.70), MatchCategory::Excellent);
        assert_eq!(MatchCategory::from_score(0.6999), MatchCategory::Good);
        assert_eq!(MatchCategory::from_score(0.55), MatchCategory::Good);
        assert_eq!(MatchCategory::from_score(0.5499), MatchCategory::Moderate);
        assert_eq!(MatchCategory::from_score(0.40), MatchCategory::Moderate);
        assert_eq!(MatchCategory::from_score(0.3999), MatchCategory::Low);
        assert_eq!(MatchCategory::from_score(1.2), MatchCategory::Excellent);
    }

    #[test]
    fn test_categories_are_ordered() {
        assert!(MatchCategory::Excellent > MatchCategory::Good);
        assert!(MatchCategory::Good > MatchCategory::Moderate);
        assert!(MatchCategory::Moderate > MatchCategory::Low);
    }

    #[test]
    fn test_skill_lists_pass_through() {
        let breakdown = score(0.4, &keywords(0.5, 0.7, 0.5), &HybridConfig::default());
        assert_eq!(breakdown.matched_skills, vec!["python"]);
        assert_eq!(breakdown.missing_required, vec!["spark"]);
        assert_eq!(breakdown.keyword_mode, KeywordMatchMode::Sectioned);
        assert_eq!(
            breakdown.recommendation,
            MatchCategory::from_score(breakdown.hybrid_score).recommendation()
        );
    }

    #[test]
    fn test_breakdown_serializes_category_snake_case() {
        let breakdown = score(0.5, &keywords(0.6, 0.7, 0.5), &HybridConfig::default());
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["match_category"], "excellent");
        assert!(json.get("missing_required").is_some());
    }
}
