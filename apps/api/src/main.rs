mod config;
mod embeddings;
mod errors;
mod explanation;
mod ingestion;
mod llm_client;
mod matching;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embeddings::http::HttpEmbedderConfig;
use crate::embeddings::{EmbeddingProvider, HashingEmbedder, HttpEmbedder};
use crate::explanation::{Explainer, LlmExplainer};
use crate::llm_client::LlmClient;
use crate::matching::hybrid::HybridConfig;
use crate::matching::keywords::KeywordExtractor;
use crate::matching::pipeline::MatchPipeline;
use crate::matching::vocabulary::Vocabulary;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Embedding provider, shared by every request
    let embedder = build_embedder(&config)?;
    info!(
        "Embedding provider ready (model: {}, dimension: {})",
        embedder.model_name(),
        embedder.dimension()
    );

    // Vocabulary
    let vocabulary = match &config.vocabulary_path {
        Some(path) => Vocabulary::from_file(path)
            .with_context(|| format!("failed to load vocabulary from {path}"))?,
        None => Vocabulary::builtin().context("bundled vocabulary is invalid")?,
    };
    let extractor = KeywordExtractor::new(&vocabulary)?;
    info!(
        "Vocabulary {} loaded ({} technical skills)",
        vocabulary.version,
        vocabulary.technical_skills.len()
    );

    let hybrid = HybridConfig {
        semantic_boost: config.semantic_boost,
        cross_domain_bonus: config.cross_domain_bonus,
        ..HybridConfig::default()
    };
    let pipeline = MatchPipeline::new(embedder, Arc::new(extractor)).with_hybrid_config(hybrid);

    // Explainer (fallback-only without an API key)
    let explainer: Option<Arc<dyn Explainer>> = match &config.llm_api_key {
        Some(key) => {
            let client = LlmClient::new(
                config.llm_api_url.clone(),
                key.clone(),
                config.llm_model.clone(),
            )?;
            info!("LLM explainer initialized (model: {})", client.model());
            Some(Arc::new(LlmExplainer::new(client)))
        }
        None => {
            warn!("No LLM API key set; explanations use the local fallback");
            None
        }
    };

    let state = AppState {
        pipeline,
        explainer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once a frontend origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP provider when `EMBEDDING_API_URL` is set, otherwise the local hashing encoder.
fn build_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    match &config.embedding_api_url {
        Some(url) => {
            let embedder = HttpEmbedder::new(HttpEmbedderConfig {
                base_url: url.clone(),
                api_key: config.embedding_api_key.clone(),
                model: config.embedding_model.clone(),
                dimension: config.local_embedding_dimensions(),
                request_dimensions: config.embedding_dimensions.is_some(),
                timeout: Duration::from_secs(config.embedding_timeout_secs),
            })?;
            Ok(Arc::new(embedder))
        }
        None => {
            warn!("EMBEDDING_API_URL not set; using the local hashing embedder");
            Ok(Arc::new(HashingEmbedder::new(
                config.local_embedding_dimensions(),
            )?))
        }
    }
}
