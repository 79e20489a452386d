//! Versioned reference vocabularies for keyword extraction.
//!
//! The default vocabulary ships as `data/vocabulary.json` and is compiled into
//! the binary. A replacement file can be supplied at startup via
//! `VOCABULARY_PATH`, so terms can be extended without touching matching code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_VOCABULARY_JSON: &str = include_str!("../../data/vocabulary.json");

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("could not read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("vocabulary term '{term}' could not be compiled: {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },

    #[error("vocabulary '{version}' has no technical skills")]
    Empty { version: String },
}

/// Reference term lists. Terms are canonicalised to trimmed lowercase and
/// de-duplicated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub version: String,
    pub technical_skills: Vec<String>,
    pub education_levels: Vec<String>,
    pub experience_levels: Vec<String>,
}

impl Vocabulary {
    /// The vocabulary bundled with the binary.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::from_json(DEFAULT_VOCABULARY_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let vocabulary: Vocabulary = serde_json::from_str(json)?;
        vocabulary.canonicalized()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn canonicalized(self) -> Result<Self, VocabularyError> {
        let vocabulary = Vocabulary {
            version: self.version,
            technical_skills: canonical_terms(self.technical_skills),
            education_levels: canonical_terms(self.education_levels),
            experience_levels: canonical_terms(self.experience_levels),
        };
        if vocabulary.technical_skills.is_empty() {
            return Err(VocabularyError::Empty {
                version: vocabulary.version,
            });
        }
        Ok(vocabulary)
    }
}

/// Lowercases, trims, drops blanks and duplicates; keeps first-seen order.
fn canonical_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
