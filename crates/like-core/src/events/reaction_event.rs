//! Reaction event - handed to the notification collaborator after a toggle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ResolvedResource;
use crate::value_objects::{EntityId, ResourceType};

/// Emitted once per successful toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionEvent {
    pub actor_id: EntityId,
    pub owner_id: EntityId,
    pub resource_id: EntityId,
    pub resource_type: ResourceType,
    pub active: bool,
    pub timestamp: DateTime<Utc>,
}

impl ReactionEvent {
    pub fn new(
        resource: &ResolvedResource,
        actor_id: EntityId,
        active: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id,
            owner_id: resource.owner_id,
            resource_id: resource.key.resource_id,
            resource_type: resource.key.resource_type,
            active,
            timestamp,
        }
    }

    /// Event type tag used on the wire
    pub const fn event_type(&self) -> &'static str {
        if self.active {
            "REACTION_ADD"
        } else {
            "REACTION_REMOVE"
        }
    }
}
