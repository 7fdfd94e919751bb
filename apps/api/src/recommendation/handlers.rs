//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::load_catalog;
use crate::errors::AppError;
use crate::models::recommendation::{RecommendRequest, RecommendResponse};
use crate::recommendation::error::InputError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub entries: usize,
    pub dimension: usize,
    pub model: String,
    pub loaded_at: DateTime<Utc>,
    pub previous_entries: usize,
}

/// POST /recommend
///
/// Returns up to `top_k` assessments ranked by semantic similarity to the
/// query (free text or a job-posting URL). Body rejections are reported in
/// the same error shape as every other failure.
pub async fn handle_recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(request) = payload.map_err(|e| InputError::MalformedBody(e.body_text()))?;
    let response = state.engine.recommend(&request).await?;
    Ok(Json(response))
}

/// POST /catalog/reload
///
/// Re-reads the catalog file and swaps it in atomically. On failure the
/// current snapshot stays in place.
pub async fn handle_reload_catalog(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let snapshot = load_catalog(
        &state.config.catalog_path,
        state.engine.embedder(),
        state.config.embed_timeout,
    )
    .await?;
    let response = ReloadResponse {
        entries: snapshot.len(),
        dimension: snapshot.dimension(),
        model: snapshot.model().to_string(),
        loaded_at: snapshot.loaded_at(),
        previous_entries: 0,
    };

    let previous = state.engine.catalog().replace(snapshot);
    info!(
        "Catalog reloaded: {} -> {} entries",
        previous.len(),
        response.entries
    );

    Ok(Json(ReloadResponse {
        previous_entries: previous.len(),
        ..response
    }))
}
