//! Pending sync jobs and the durable rows they become

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ReactionKey, ResourceKey};
use crate::value_objects::{EntityId, ResourceType};

/// A reaction state change not yet written to the durable store
///
/// Jobs carry the resulting `active` value, so applying the latest job for a
/// key is enough to converge regardless of how many toggles preceded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSyncJob {
    pub actor_id: EntityId,
    pub resource_id: EntityId,
    pub resource_type: ResourceType,
    pub active: bool,
    pub is_first_reaction: bool,
    /// When the reaction was first created, carried from the cached state
    pub created_at: DateTime<Utc>,
    pub enqueued_at: DateTime<Utc>,
}

impl PendingSyncJob {
    pub fn new(key: ReactionKey, active: bool, is_first_reaction: bool) -> Self {
        Self::at(key, active, is_first_reaction, Utc::now())
    }

    pub fn at(
        key: ReactionKey,
        active: bool,
        is_first_reaction: bool,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id: key.actor_id,
            resource_id: key.resource_id,
            resource_type: key.resource_type,
            active,
            is_first_reaction,
            created_at: enqueued_at,
            enqueued_at,
        }
    }

    /// Override the creation time written on insert
    pub fn created(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    #[inline]
    pub const fn key(&self) -> ReactionKey {
        ReactionKey::new(self.resource_type, self.resource_id, self.actor_id)
    }

    #[inline]
    pub const fn resource(&self) -> ResourceKey {
        ResourceKey::new(self.resource_type, self.resource_id)
    }

    /// Collapse a newer job for the same key onto this one
    ///
    /// The newer job's state wins; a first-reaction flag is never lost since
    /// the durable row may still be missing, and the earliest creation time
    /// is kept.
    pub fn absorb(&mut self, newer: PendingSyncJob) {
        let first = self.is_first_reaction || newer.is_first_reaction;
        let created_at = self.created_at.min(newer.created_at);
        *self = newer;
        self.is_first_reaction = first;
        self.created_at = created_at;
    }
}

/// Persisted reaction row, unique on (actor, resource, type)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionRow {
    pub actor_id: EntityId,
    pub resource_id: EntityId,
    pub resource_type: ResourceType,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl ReactionRow {
    /// Row written by a job. An existing row keeps its `created_at`.
    pub fn from_job(job: &PendingSyncJob) -> Self {
        Self {
            actor_id: job.actor_id,
            resource_id: job.resource_id,
            resource_type: job.resource_type,
            active: job.active,
            created_at: job.created_at,
            modified_at: job.enqueued_at,
        }
    }

    #[inline]
    pub const fn key(&self) -> ReactionKey {
        ReactionKey::new(self.resource_type, self.resource_id, self.actor_id)
    }
}

/// What an upsert did to the durable row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated { was_active: bool },
}

impl UpsertOutcome {
    /// Net change to the resource's aggregate count after writing `new_active`
    pub fn like_delta(self, new_active: bool) -> i64 {
        let before = match self {
            Self::Inserted => false,
            Self::Updated { was_active } => was_active,
        };
        i64::from(new_active) - i64::from(before)
    }
}
