//! Cache traits (ports) - low-latency reaction state and live counts

use async_trait::async_trait;

use crate::entities::{CountDelta, ReactionKey, ReactionState, ResourceKey};
use crate::traits::RepoResult;

/// Atomic per-resource like counter
///
/// Implementations must apply `add` as a single atomic operation, never as
/// read-then-write, and must never let a count drop below zero.
#[async_trait]
pub trait LikeCounter: Send + Sync {
    /// Apply `delta` and return the resulting count
    async fn add(&self, key: ResourceKey, delta: i64) -> RepoResult<i64>;

    /// Current count, 0 when absent
    async fn get(&self, key: ResourceKey) -> RepoResult<i64>;

    /// Current count, None when the counter holds nothing for the key
    async fn peek(&self, key: ResourceKey) -> RepoResult<Option<i64>>;

    /// Store `count` only when the key is absent. Returns true if it was stored.
    async fn seed(&self, key: ResourceKey, count: i64) -> RepoResult<bool>;

    /// Overwrite the count, clamped at zero
    async fn set(&self, key: ResourceKey, count: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait ReactionCache: Send + Sync {
    async fn get_state(&self, key: ReactionKey) -> RepoResult<Option<ReactionState>>;

    async fn set_state(&self, key: ReactionKey, state: &ReactionState) -> RepoResult<()>;

    /// Atomically change the like count and return the new value
    async fn increment_count(&self, key: ResourceKey, delta: CountDelta) -> RepoResult<i64>;

    async fn get_count(&self, key: ResourceKey) -> RepoResult<i64>;

    /// Cached count, None when the count is cold
    async fn peek_count(&self, key: ResourceKey) -> RepoResult<Option<i64>>;

    /// Warm a cold count. An existing count is left alone.
    async fn seed_count(&self, key: ResourceKey, count: i64) -> RepoResult<bool>;

    /// Replace the cached count with a reconciled value
    async fn set_count(&self, key: ResourceKey, count: i64) -> RepoResult<()>;

    /// Drop cached state for a key
    async fn invalidate(&self, key: ReactionKey) -> RepoResult<()>;

    async fn ping(&self) -> RepoResult<()>;
}
