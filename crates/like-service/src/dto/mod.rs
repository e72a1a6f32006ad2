//! Data Transfer Objects for API requests and responses

mod requests;
mod responses;

pub use requests::ToggleLikeRequest;
pub use responses::{HealthChecks, HealthResponse, LikeCountResponse, ReadinessResponse};
