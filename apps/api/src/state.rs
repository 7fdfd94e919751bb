use std::sync::Arc;

use crate::config::Config;
use crate::recommendation::RecommendationEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the catalog snapshot, embedder, fetcher and ranker.
    pub engine: Arc<RecommendationEngine>,
    pub config: Config,
}
