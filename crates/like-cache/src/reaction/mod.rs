//! Reaction Cache backends and atomic like counters.

mod counter;
mod keys;
mod memory;
mod redis_cache;

pub use counter::{AtomicLikeCounter, RedisLikeCounter};
pub use keys::{count_key, reaction_key, COUNT_PREFIX, REACTION_PREFIX};
pub use memory::MemoryReactionCache;
pub use redis_cache::RedisReactionCache;
