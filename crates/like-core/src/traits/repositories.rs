//! Repository traits (ports) - durable-store collaborators of the engine
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{ReactionKey, ReactionRow, ResolvedResource, ResourceKey, UpsertOutcome};
use crate::error::DomainError;
use crate::value_objects::{EntityId, ResourceType};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Resource Resolver
// ============================================================================

#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Resolve a resource and its owner. Soft-deleted resources resolve to None.
    async fn resolve(&self, key: ResourceKey) -> RepoResult<Option<ResolvedResource>>;
}

// ============================================================================
// Actor Repository
// ============================================================================

#[async_trait]
pub trait ActorRepository: Send + Sync {
    /// Check whether an actor identity is valid
    async fn exists(&self, actor_id: EntityId) -> RepoResult<bool>;
}

// ============================================================================
// Reaction Store
// ============================================================================

#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Find the durable row for a reaction key
    async fn find_reaction(&self, key: ReactionKey) -> RepoResult<Option<ReactionRow>>;

    /// Insert the row, or update `active` and `modified_at` of the existing one
    async fn upsert_reaction(&self, row: &ReactionRow) -> RepoResult<UpsertOutcome>;

    /// Upsert several rows atomically. Outcomes are returned in input order.
    async fn upsert_reactions(&self, rows: &[ReactionRow]) -> RepoResult<Vec<UpsertOutcome>>;

    /// Count active reactions per resource id for one resource type
    async fn count_active_grouped(
        &self,
        resource_type: ResourceType,
    ) -> RepoResult<HashMap<EntityId, i64>>;

    /// Set a resource's aggregate count when it differs. Returns true if a row changed.
    async fn update_aggregate_count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
        count: i64,
    ) -> RepoResult<bool>;

    /// Zero the aggregate of every resource of this type not in `with_likes`.
    /// Returns the ids whose aggregate was reset.
    async fn reset_unreacted_counts(
        &self,
        resource_type: ResourceType,
        with_likes: &[EntityId],
    ) -> RepoResult<Vec<EntityId>>;

    /// Aggregate count of a live resource, None when it is missing or deleted
    async fn aggregate_count(&self, key: ResourceKey) -> RepoResult<Option<i64>>;

    /// Shift a resource's aggregate count by `delta`, never below zero
    async fn adjust_aggregate_count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
        delta: i64,
    ) -> RepoResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}
