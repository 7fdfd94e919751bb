use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus a summary of the catalog snapshot being served.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.engine.catalog().snapshot();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "assessment-recommender",
        "catalog": {
            "entries": snapshot.len(),
            "dimension": snapshot.dimension(),
            "model": snapshot.model(),
            "loaded_at": snapshot.loaded_at(),
        },
        "ranker": state.engine.ranker_name(),
    }))
}
