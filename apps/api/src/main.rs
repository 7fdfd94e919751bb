mod catalog;
mod config;
mod embedding;
mod errors;
mod models;
mod recommendation;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{load_catalog, CatalogStore};
use crate::config::{Config, EmbeddingProvider};
use crate::embedding::{Embedder, HashEmbedder, OllamaEmbedder};
use crate::recommendation::fetcher::HttpFetcher;
use crate::recommendation::normalizer::QueryNormalizer;
use crate::recommendation::ranker::LinearRanker;
use crate::recommendation::{EngineSettings, RecommendationEngine};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting Assessment Recommender v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedder (Ollama by default; `hash` runs fully offline)
    let embedder = build_embedder(&config)?;
    info!(
        "Embedder initialized (model: {}, dimension: {})",
        embedder.model_id(),
        embedder.dimension()
    );

    // Load the catalog snapshot; any invariant violation aborts startup
    let snapshot = load_catalog(&config.catalog_path, embedder.as_ref(), config.embed_timeout)
        .await
        .context("Catalog failed to load")?;
    let catalog = Arc::new(CatalogStore::new(snapshot));

    let fetcher = HttpFetcher::new(config.fetch_timeout).context("Failed to build HTTP client")?;
    let normalizer = QueryNormalizer::new(Arc::new(fetcher), config.max_query_chars);

    let engine = RecommendationEngine::new(
        normalizer,
        embedder,
        Arc::new(LinearRanker),
        catalog,
        EngineSettings {
            default_top_k: config.default_top_k,
            max_top_k: config.max_top_k,
            min_score: config.min_score,
            embed_timeout: config.embed_timeout,
        },
    );

    let state = AppState {
        engine: Arc::new(engine),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    Ok(match config.embedding_provider {
        EmbeddingProvider::Ollama => Arc::new(
            OllamaEmbedder::new(
                config.ollama_url.clone(),
                config.embedding_model.clone(),
                config.embedding_dim,
                config.embed_timeout,
            )
            .context("Failed to build embedding client")?,
        ),
        EmbeddingProvider::Hash => Arc::new(HashEmbedder::new(config.embedding_dim)),
    })
}
