//! In-process Reaction Cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use like_core::traits::{LikeCounter, ReactionCache, RepoResult};
use like_core::{CountDelta, ReactionKey, ReactionState, ResourceKey};

use crate::reaction::counter::AtomicLikeCounter;

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: ReactionState,
    expires_at: Instant,
}

/// Reaction Cache held in process memory
///
/// Expired entries read as absent and are dropped on access.
pub struct MemoryReactionCache {
    states: DashMap<ReactionKey, Entry>,
    counter: Arc<dyn LikeCounter>,
    ttl: Duration,
}

impl MemoryReactionCache {
    #[must_use]
    pub fn new(counter: Arc<dyn LikeCounter>, ttl: Duration) -> Self {
        Self {
            states: DashMap::new(),
            counter,
            ttl,
        }
    }

    /// Cache with its own in-process counter
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(Arc::new(AtomicLikeCounter::new()), ttl)
    }

    /// Number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.states.iter().filter(|e| e.expires_at > now).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReactionCache for MemoryReactionCache {
    async fn get_state(&self, key: ReactionKey) -> RepoResult<Option<ReactionState>> {
        let now = Instant::now();
        let expired = match self.states.get(&key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.state)),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.states.remove_if(&key, |_, entry| entry.expires_at <= now);
        }
        Ok(None)
    }

    async fn set_state(&self, key: ReactionKey, state: &ReactionState) -> RepoResult<()> {
        self.states.insert(
            key,
            Entry {
                state: *state,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }

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

    async fn invalidate(&self, key: ReactionKey) -> RepoResult<()> {
        self.states.remove(&key);
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
