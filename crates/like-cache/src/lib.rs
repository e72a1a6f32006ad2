//! # like-cache
//!
//! Reaction Cache implementations and event publishing.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Reaction Cache**: Per-key reaction state with TTL, backed by Redis or process memory
//! - **Like Counters**: Atomic, non-negative per-resource counters
//! - **Pub/Sub**: Reaction events published to per-owner notification channels
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use like_cache::{RedisLikeCounter, RedisPool, RedisPoolConfig, RedisReactionCache};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let counter = Arc::new(RedisLikeCounter::new(pool.clone()));
//! let cache = RedisReactionCache::new(pool, counter, Duration::from_secs(604_800));
//! ```

pub mod pool;
pub mod pubsub;
pub mod reaction;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export reaction cache types
pub use reaction::{
    count_key, reaction_key, AtomicLikeCounter, MemoryReactionCache, RedisLikeCounter,
    RedisReactionCache, COUNT_PREFIX, REACTION_PREFIX,
};

// Re-export pubsub types
pub use pubsub::{
    notification_channel, LogEventPublisher, PubSubEvent, RedisEventPublisher,
    NOTIFICATION_CHANNEL_PREFIX,
};
