//! Reaction keys and cached reaction state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::ReactionRow;
use crate::value_objects::{EntityId, ResourceType};

/// Identity of a reacted-to resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceKey {
    pub resource_type: ResourceType,
    pub resource_id: EntityId,
}

impl ResourceKey {
    pub const fn new(resource_type: ResourceType, resource_id: EntityId) -> Self {
        Self {
            resource_type,
            resource_id,
        }
    }

    /// Key of `actor_id`'s reaction on this resource
    #[inline]
    pub const fn reaction(self, actor_id: EntityId) -> ReactionKey {
        ReactionKey::new(self.resource_type, self.resource_id, actor_id)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource_id)
    }
}

/// One actor's relationship to one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionKey {
    pub resource_type: ResourceType,
    pub resource_id: EntityId,
    pub actor_id: EntityId,
}

impl ReactionKey {
    pub const fn new(resource_type: ResourceType, resource_id: EntityId, actor_id: EntityId) -> Self {
        Self {
            resource_type,
            resource_id,
            actor_id,
        }
    }

    /// Project onto the reacted-to resource
    #[inline]
    pub const fn resource(&self) -> ResourceKey {
        ResourceKey::new(self.resource_type, self.resource_id)
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.resource_type, self.resource_id, self.actor_id
        )
    }
}

/// Cached reaction state for a ReactionKey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionState {
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: DateTime<Utc>,
    /// `modified_at` of the durable row this state was loaded from
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ReactionState {
    /// State of a reaction that has never existed before
    pub fn first(now: DateTime<Utc>) -> Self {
        Self {
            active: true,
            created_at: Some(now),
            modified_at: now,
            last_synced_at: None,
        }
    }

    /// State rebuilt from the durable row on a cache miss
    pub fn from_row(row: &ReactionRow) -> Self {
        Self {
            active: row.active,
            created_at: Some(row.created_at),
            modified_at: row.modified_at,
            last_synced_at: Some(row.modified_at),
        }
    }

    /// Flip `active`, keeping the original creation time
    pub fn toggled(&self, now: DateTime<Utc>) -> Self {
        Self {
            active: !self.active,
            created_at: self.created_at.or(Some(now)),
            modified_at: now,
            last_synced_at: self.last_synced_at,
        }
    }
}

/// Change applied to a cached like count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDelta {
    Increment,
    Decrement,
}

impl CountDelta {
    /// Delta implied by the post-toggle state
    #[inline]
    pub const fn for_active(active: bool) -> Self {
        if active {
            Self::Increment
        } else {
            Self::Decrement
        }
    }

    #[inline]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

/// Result of a toggle as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub resource_id: EntityId,
    pub actor_id: EntityId,
    pub resource_type: ResourceType,
    pub active: bool,
    pub count: i64,
    pub timestamp: DateTime<Utc>,
}
