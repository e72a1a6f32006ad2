//! Redis Pub/Sub publisher for reaction events.
//!
//! Each event goes to the resource owner's notification channel, where the
//! notification service picks it up.

use async_trait::async_trait;
use like_core::traits::{EventPublisher, RepoResult};
use like_core::{EntityId, ReactionEvent};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisPoolError};

/// Channel prefix for per-member notification events
pub const NOTIFICATION_CHANNEL_PREFIX: &str = "notifications:";

/// `notifications:{owner_id}`
#[must_use]
pub fn notification_channel(owner_id: EntityId) -> String {
    format!("{NOTIFICATION_CHANNEL_PREFIX}{owner_id}")
}

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "REACTION_ADD")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Wrap a reaction event
    pub fn from_reaction(event: &ReactionEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            data: serde_json::to_value(event)?,
        })
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Publishes reaction events through Redis Pub/Sub
#[derive(Clone)]
pub struct RedisEventPublisher {
    pool: RedisPool,
}

impl RedisEventPublisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: &ReactionEvent) -> RepoResult<()> {
        let payload = PubSubEvent::from_reaction(event)
            .and_then(|e| e.to_json())
            .map_err(RedisPoolError::from)?;
        let channel = notification_channel(event.owner_id);

        let mut conn = self.pool.get().await?;
        let receivers: u32 = conn
            .publish(&channel, &payload)
            .await
            .map_err(RedisPoolError::from)?;

        tracing::debug!(
            channel = %channel,
            event_type = event.event_type(),
            receivers = receivers,
            "Published event"
        );

        Ok(())
    }
}

/// Publisher for deployments without Redis; records events in the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish(&self, event: &ReactionEvent) -> RepoResult<()> {
        tracing::debug!(
            owner_id = %event.owner_id,
            actor_id = %event.actor_id,
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            event_type = event.event_type(),
            "Reaction event"
        );
        Ok(())
    }
}
