//! Resolved resource - a reacted-to resource and its owner

use crate::entities::ResourceKey;
use crate::value_objects::EntityId;

/// Resource handle returned by a ResourceResolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedResource {
    pub key: ResourceKey,
    pub owner_id: EntityId,
}

impl ResolvedResource {
    pub const fn new(key: ResourceKey, owner_id: EntityId) -> Self {
        Self { key, owner_id }
    }

    #[inline]
    pub fn is_owned_by(&self, actor_id: EntityId) -> bool {
        self.owner_id == actor_id
    }
}
