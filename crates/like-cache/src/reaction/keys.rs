//! Redis key layout for reaction state and counts.

use like_core::{ReactionKey, ResourceKey};

/// Key prefix for per-actor reaction state
pub const REACTION_PREFIX: &str = "like:";
/// Key prefix for per-resource like counts
pub const COUNT_PREFIX: &str = "like_count:";

/// `like:{TYPE}:{resource_id}:{actor_id}`
#[must_use]
pub fn reaction_key(key: &ReactionKey) -> String {
    format!("{REACTION_PREFIX}{key}")
}

/// `like_count:{TYPE}:{resource_id}`
#[must_use]
pub fn count_key(key: &ResourceKey) -> String {
    format!("{COUNT_PREFIX}{key}")
}
