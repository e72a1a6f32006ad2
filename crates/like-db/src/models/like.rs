//! Like database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the likes table
#[derive(Debug, Clone, FromRow)]
pub struct LikeModel {
    pub actor_id: i64,
    pub resource_id: i64,
    pub resource_type: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Active like count per resource (from grouped query)
#[derive(Debug, Clone, FromRow)]
pub struct LikeCountModel {
    pub resource_id: i64,
    pub count: i64,
}

/// Row returned by the upsert, `was_active` is NULL when the row was inserted
#[derive(Debug, Clone, FromRow)]
pub struct UpsertModel {
    pub was_active: Option<bool>,
}

/// Owner of a post or comment
#[derive(Debug, Clone, FromRow)]
pub struct OwnerModel {
    pub author_id: i64,
}
