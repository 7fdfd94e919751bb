//! Recommendation Engine: the single `recommend(request)` entry point.
//!
//! Pipeline: normalize → embed → rank → assemble. The catalog snapshot is
//! loaded once per request, so a concurrent reload never mixes catalogs.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::embedding::{validate_embedding, Embedder, EmbeddingError};
use crate::models::recommendation::{RecommendRequest, RecommendResponse};
use crate::recommendation::assembler::assemble;
use crate::recommendation::error::{InputError, RecommendError};
use crate::recommendation::normalizer::QueryNormalizer;
use crate::recommendation::ranker::{RankOptions, Ranker};

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Used when the request carries no `top_k`.
    pub default_top_k: usize,
    /// Larger request values are clamped to this.
    pub max_top_k: usize,
    pub min_score: Option<f32>,
    pub embed_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            max_top_k: DEFAULT_TOP_K,
            min_score: None,
            embed_timeout: Duration::from_secs(30),
        }
    }
}

pub struct RecommendationEngine {
    normalizer: QueryNormalizer,
    embedder: Arc<dyn Embedder>,
    ranker: Arc<dyn Ranker>,
    catalog: Arc<CatalogStore>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        normalizer: QueryNormalizer,
        embedder: Arc<dyn Embedder>,
        ranker: Arc<dyn Ranker>,
        catalog: Arc<CatalogStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            normalizer,
            embedder,
            ranker,
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn ranker_name(&self) -> &'static str {
        self.ranker.name()
    }

    /// Either a full (possibly empty) ordered list or a single error; never
    /// partial results.
    pub async fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<RecommendResponse, RecommendError> {
        let request_id = Uuid::new_v4();

        // Cheap validation first so a bad top_k never costs a fetch.
        let top_k = self.resolve_top_k(request.top_k)?;

        let query = self.normalizer.normalize(&request.query).await?;
        debug!(
            %request_id,
            kind = ?query.kind,
            source = query.source_url.as_ref().map(|u| u.as_str()),
            chars = query.text.chars().count(),
            "query normalized"
        );

        let vector = self.embed(&query.text).await?;

        let snapshot = self.catalog.snapshot();
        let ranked = self.ranker.rank(
            &vector,
            &snapshot,
            RankOptions {
                top_k,
                min_score: self.settings.min_score,
            },
        )?;

        let recommendations = assemble(&ranked, request.include_scores);
        info!(
            %request_id,
            kind = ?query.kind,
            top_k,
            returned = recommendations.len(),
            top_score = ranked.first().map(|s| s.score),
            "recommendations served"
        );

        Ok(RecommendResponse { recommendations })
    }

    fn resolve_top_k(&self, requested: Option<i64>) -> Result<usize, InputError> {
        let Some(k) = requested else {
            return Ok(self.settings.default_top_k);
        };
        let k = usize::try_from(k)
            .ok()
            .filter(|k| *k > 0)
            .ok_or(InputError::InvalidTopK(k))?;
        Ok(k.min(self.settings.max_top_k))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let timeout = self.settings.embed_timeout;
        let vector = tokio::time::timeout(timeout, self.embedder.embed(text))
            .await
            .map_err(|_| EmbeddingError::Timeout(timeout))?
            .map_err(|e| {
                warn!(model = self.embedder.model_id(), "embedding failed: {e}");
                e
            })?;
        validate_embedding(&vector, self.embedder.dimension())?;
        Ok(vector)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
