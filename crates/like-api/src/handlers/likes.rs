//! Like handlers

use axum::{
    extract::{Path, State},
    Json,
};
use like_core::{EntityId, ResourceType, ToggleResult};
use like_service::{LikeCountResponse, LikeService, ToggleLikeRequest};

use crate::extractors::{ActorId, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Toggle the caller's like on a post, comment or reply
///
/// POST /api/v1/likes/toggle
pub async fn toggle_like(
    State(state): State<AppState>,
    ActorId(actor_id): ActorId,
    ValidatedJson(body): ValidatedJson<ToggleLikeRequest>,
) -> ApiResult<Json<ToggleResult>> {
    let resource_type = body.resource_type()?;

    let service = LikeService::new(state.service_context());
    let result = service
        .toggle(actor_id, resource_type, body.resource_id)
        .await?;
    Ok(Json(result))
}

/// Cached like count of a resource
///
/// GET /api/v1/likes/{resource_type}/{resource_id}
pub async fn get_like_count(
    State(state): State<AppState>,
    Path((resource_type, resource_id)): Path<(String, String)>,
) -> ApiResult<Json<LikeCountResponse>> {
    let resource_type: ResourceType = resource_type.parse()?;
    let resource_id = EntityId::parse(&resource_id)
        .map_err(|_| ApiError::invalid_path("Invalid resource_id format"))?;

    let service = LikeService::new(state.service_context());
    let count = service.count(resource_type, resource_id).await?;
    Ok(Json(LikeCountResponse {
        resource_type,
        resource_id,
        count,
    }))
}
