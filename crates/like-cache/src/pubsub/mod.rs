//! Reaction event publishing.

mod publisher;

pub use publisher::{
    notification_channel, LogEventPublisher, PubSubEvent, RedisEventPublisher,
    NOTIFICATION_CHANNEL_PREFIX,
};
