//! Atomic like counters.
//!
//! Both implementations apply a delta in one atomic step and floor the
//! result at zero, so an unlike racing ahead of its like is absorbed.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use like_core::traits::{LikeCounter, RepoResult};
use like_core::ResourceKey;
use redis::Script;

use crate::pool::{RedisPool, RedisPoolError};
use crate::reaction::keys::count_key;

/// Executed atomically by Redis
const ADD_FLOORED_LUA: &str = r"
local next = (tonumber(redis.call('GET', KEYS[1])) or 0) + tonumber(ARGV[1])
if next < 0 then
    next = 0
end
redis.call('SET', KEYS[1], next)
return next
";

/// Like counter stored in Redis, updated through a Lua script
#[derive(Clone)]
pub struct RedisLikeCounter {
    pool: RedisPool,
    script: Script,
}

impl RedisLikeCounter {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            script: Script::new(ADD_FLOORED_LUA),
        }
    }
}

#[async_trait]
impl LikeCounter for RedisLikeCounter {
    async fn add(&self, key: ResourceKey, delta: i64) -> RepoResult<i64> {
        let mut conn = self.pool.get().await?;
        let count: i64 = self
            .script
            .key(count_key(&key))
            .arg(delta)
            .invoke_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;
        Ok(count)
    }

    async fn get(&self, key: ResourceKey) -> RepoResult<i64> {
        Ok(self.peek(key).await?.unwrap_or(0))
    }

    async fn peek(&self, key: ResourceKey) -> RepoResult<Option<i64>> {
        Ok(self.pool.get_i64(&count_key(&key)).await?)
    }

    async fn seed(&self, key: ResourceKey, count: i64) -> RepoResult<bool> {
        Ok(self.pool.set_i64_nx(&count_key(&key), count.max(0)).await?)
    }

    async fn set(&self, key: ResourceKey, count: i64) -> RepoResult<()> {
        Ok(self.pool.set_i64(&count_key(&key), count.max(0)).await?)
    }
}

/// In-process like counter, one atomic cell per resource
#[derive(Debug, Default)]
pub struct AtomicLikeCounter {
    counts: DashMap<ResourceKey, AtomicI64>,
}

impl AtomicLikeCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikeCounter for AtomicLikeCounter {
    async fn add(&self, key: ResourceKey, delta: i64) -> RepoResult<i64> {
        let cell = self.counts.entry(key).or_insert_with(|| AtomicI64::new(0));
        let previous = cell
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some((current + delta).max(0))
            })
            .unwrap_or_else(|current| current);
        Ok((previous + delta).max(0))
    }

    async fn get(&self, key: ResourceKey) -> RepoResult<i64> {
        Ok(self
            .counts
            .get(&key)
            .map_or(0, |cell| cell.load(Ordering::Acquire)))
    }

    async fn peek(&self, key: ResourceKey) -> RepoResult<Option<i64>> {
        Ok(self
            .counts
            .get(&key)
            .map(|cell| cell.load(Ordering::Acquire)))
    }

    async fn seed(&self, key: ResourceKey, count: i64) -> RepoResult<bool> {
        match self.counts.entry(key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(AtomicI64::new(count.max(0)));
                Ok(true)
            }
        }
    }

    async fn set(&self, key: ResourceKey, count: i64) -> RepoResult<()> {
        self.counts
            .entry(key)
            .or_insert_with(|| AtomicI64::new(0))
            .store(count.max(0), Ordering::Release);
        Ok(())
    }
}
