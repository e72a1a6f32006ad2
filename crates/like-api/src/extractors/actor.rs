//! Actor identity extractor
//!
//! The upstream authentication layer forwards the caller's member id in the
//! `X-Actor-Id` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use like_core::EntityId;

use crate::response::ApiError;

/// Header carrying the authenticated member id
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorId(pub EntityId);

impl ActorId {
    fn from_header(value: &str) -> Option<Self> {
        EntityId::parse(value)
            .ok()
            .filter(|id| id.into_inner() > 0)
            .map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .ok_or(ApiError::MissingActor)?;

        value
            .to_str()
            .ok()
            .and_then(Self::from_header)
            .ok_or_else(|| {
                tracing::warn!("Rejected malformed actor id header");
                ApiError::InvalidActor
            })
    }
}
