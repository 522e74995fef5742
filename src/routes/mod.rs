use axum::{routing::get, Router};

use crate::state::AppState;

pub mod health;
pub mod summary;

pub fn create_router(state: AppState) -> Router<()> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/summary", get(summary::record_summary))
        .with_state(state)
}
