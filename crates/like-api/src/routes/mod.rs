//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, likes};
use crate::state::AppState;

/// API routes mounted under /api/v1
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (kept apart so rate limiting never applies to probes)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/likes/toggle", post(likes::toggle_like))
        .route("/likes/:resource_type/:resource_id", get(likes::get_like_count))
}
