//! Vocabulary-driven keyword extraction.
//!
//! Every vocabulary term is compiled once into a whole-word pattern. Text is
//! lowercased before matching; there is no stemming or fuzzy matching.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::vocabulary::{Vocabulary, VocabularyError};

/// Keywords found in a document, one set per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub technical_skills: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub experience_level: BTreeSet<String>,
}

struct CompiledTerm {
    term: String,
    pattern: Regex,
}

/// Compiled vocabulary. Built once at startup and shared read-only.
pub struct KeywordExtractor {
    version: String,
    technical_skills: Vec<CompiledTerm>,
    education_levels: Vec<CompiledTerm>,
    experience_levels: Vec<CompiledTerm>,
}

impl KeywordExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, VocabularyError> {
        Ok(Self {
            version: vocabulary.version.clone(),
            technical_skills: compile_terms(&vocabulary.technical_skills)?,
            education_levels: compile_terms(&vocabulary.education_levels)?,
            experience_levels: compile_terms(&vocabulary.experience_levels)?,
        })
    }

    pub fn vocabulary_version(&self) -> &str {
        &self.version
    }

    pub fn extract(&self, text: &str) -> KeywordSet {
        let lower = text.to_lowercase();
        KeywordSet {
            technical_skills: find_terms(&self.technical_skills, &lower),
            education: find_terms(&self.education_levels, &lower),
            experience_level: find_terms(&self.experience_levels, &lower),
        }
    }

    /// Technical skills only; used for per-section skill extraction.
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        find_terms(&self.technical_skills, &text.to_lowercase())
    }
}

fn compile_terms(terms: &[String]) -> Result<Vec<CompiledTerm>, VocabularyError> {
    terms
        .iter()
        .map(|term| {
            let pattern =
                Regex::new(&whole_word_pattern(term)).map_err(|source| VocabularyError::Pattern {
                    term: term.clone(),
                    source,
                })?;
            Ok(CompiledTerm {
                term: term.clone(),
                pattern,
            })
        })
        .collect()
}

/// `\b` is only meaningful next to a word character, so it is emitted only on
/// ends of the term that are word characters (`c++` keeps a leading boundary only).
fn whole_word_pattern(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let leading = term.chars().next().is_some_and(is_word);
    let trailing = term.chars().last().is_some_and(is_word);

    format!(
        "{}{}{}",
        if leading { r"\b" } else { "" },
        regex::escape(term),
        if trailing { r"\b" } else { "" }
    )
}

fn find_terms(terms: &[CompiledTerm], lower_text: &str) -> BTreeSet<String> {
    terms
        .iter()
        .filter(|t| t.pattern.is_match(lower_text))
        .map(|t| t.term.clone())
        .collect()
}
