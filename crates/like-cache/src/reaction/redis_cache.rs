//! Reaction Cache stored in Redis.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use like_core::traits::{LikeCounter, ReactionCache, RepoResult};
use like_core::{CountDelta, ReactionKey, ReactionState, ResourceKey};
use tracing::instrument;

use crate::pool::RedisPool;
use crate::reaction::keys::reaction_key;

/// Reaction state as JSON under `like:*` keys; counts delegated to the
/// injected counter
#[derive(Clone)]
pub struct RedisReactionCache {
    pool: RedisPool,
    counter: Arc<dyn LikeCounter>,
    ttl: Duration,
}

impl RedisReactionCache {
    #[must_use]
    pub fn new(pool: RedisPool, counter: Arc<dyn LikeCounter>, ttl: Duration) -> Self {
        Self { pool, counter, ttl }
    }
}

#[async_trait]
impl ReactionCache for RedisReactionCache {
    #[instrument(skip(self))]
    async fn get_state(&self, key: ReactionKey) -> RepoResult<Option<ReactionState>> {
        Ok(self.pool.get_value(&reaction_key(&key)).await?)
    }

    #[instrument(skip(self, state))]
    async fn set_state(&self, key: ReactionKey, state: &ReactionState) -> RepoResult<()> {
        self.pool
            .set(&reaction_key(&key), state, Some(self.ttl.as_secs()))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_count(&self, key: ResourceKey, delta: CountDelta) -> RepoResult<i64> {
        self.counter.add(key, delta.as_i64()).await
    }

    async fn get_count(&self, key: ResourceKey) -> RepoResult<i64> {
        self.counter.get(key).await
    }

    async fn peek_count(&self, key: ResourceKey) -> RepoResult<Option<i64>> {
        self.counter.peek(key).await
    }

    async fn seed_count(&self, key: ResourceKey, count: i64) -> RepoResult<bool> {
        self.counter.seed(key, count).await
    }

    async fn set_count(&self, key: ResourceKey, count: i64) -> RepoResult<()> {
        self.counter.set(key, count).await
    }

    #[instrument(skip(self))]
    async fn invalidate(&self, key: ReactionKey) -> RepoResult<()> {
        self.pool.delete(&reaction_key(&key)).await?;
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(self.pool.health_check().await?)
    }
}
