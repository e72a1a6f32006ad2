//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use like_service::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let (db, cache) = tokio::join!(ctx.store().ping(), ctx.cache().ping());
    if let Err(e) = &db {
        tracing::warn!(error = %e, "Durable store ping failed");
    }
    if let Err(e) = &cache {
        tracing::warn!(error = %e, "Reaction cache ping failed");
    }

    let response = ReadinessResponse::ready(db.is_ok(), cache.is_ok(), ctx.queue().len());
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
