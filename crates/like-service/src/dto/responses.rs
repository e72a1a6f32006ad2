//! Response DTOs for API endpoints

use chrono::{DateTime, Utc};
use like_core::{EntityId, ResourceType};
use serde::Serialize;

/// Cached like count of one resource
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCountResponse {
    pub resource_type: ResourceType,
    pub resource_id: EntityId,
    pub count: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
    /// Jobs waiting for the next durable flush
    pub pending_jobs: usize,
}

/// Health check status for each backing store
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub cache: String,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, cache_healthy: bool, pending_jobs: usize) -> Self {
        let all_healthy = database_healthy && cache_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy),
                cache: health_label(cache_healthy),
            },
            pending_jobs,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
