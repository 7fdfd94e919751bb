pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/recommend", post(handlers::handle_recommend))
        .route("/catalog/reload", post(handlers::handle_reload_catalog))
        .with_state(state)
}
