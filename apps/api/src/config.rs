use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL as DEFAULT_LLM_API_URL, DEFAULT_MODEL as DEFAULT_LLM_MODEL};
use crate::matching::hybrid::{DEFAULT_CROSS_DOMAIN_BONUS, DEFAULT_SEMANTIC_BOOST};

const DEFAULT_EMBEDDING_MODEL: &str = "all-mpnet-base-v2";
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; every external collaborator is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// OpenAI-compatible `/embeddings` base URL. Unset → local hashing embedder.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_dimensions: Option<usize>,
    pub embedding_timeout_secs: u64,
    /// Unset → deterministic fallback explanations only.
    pub llm_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub vocabulary_path: Option<String>,
    pub semantic_boost: f64,
    pub cross_domain_bonus: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dimensions: parse_env("EMBEDDING_DIMENSIONS")?,
            embedding_timeout_secs: parse_env("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(30),
            llm_api_key: optional_env("LLM_API_KEY").or_else(|| optional_env("GROQ_API_KEY")),
            llm_api_url: optional_env("LLM_API_URL")
                .unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            vocabulary_path: optional_env("VOCABULARY_PATH"),
            semantic_boost: parse_env("SEMANTIC_BOOST")?.unwrap_or(DEFAULT_SEMANTIC_BOOST),
            cross_domain_bonus: parse_env("CROSS_DOMAIN_BONUS")?
                .unwrap_or(DEFAULT_CROSS_DOMAIN_BONUS),
        })
    }

    /// Dimensionality used by the local hashing embedder.
    pub fn local_embedding_dimensions(&self) -> usize {
        self.embedding_dimensions
            .unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS)
    }
}

/// Returns `None` for unset or blank variables.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("{key} has an invalid value: '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_missing_is_none() {
        let value: Option<u16> = parse_env("RESUME_MATCHER_TEST_UNSET_VAR").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_parse_env_invalid_value_names_the_key() {
        std::env::set_var("RESUME_MATCHER_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("RESUME_MATCHER_TEST_BAD_PORT").unwrap_err();
        assert!(err.to_string().contains("RESUME_MATCHER_TEST_BAD_PORT"));
    }

    #[test]
    fn test_blank_env_treated_as_unset() {
        std::env::set_var("RESUME_MATCHER_TEST_BLANK", "   ");
        assert!(optional_env("RESUME_MATCHER_TEST_BLANK").is_none());
    }
}
