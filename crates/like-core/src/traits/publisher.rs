//! Event publisher trait (port) - one-way notification hand-off

use async_trait::async_trait;

use crate::events::ReactionEvent;
use crate::traits::RepoResult;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Send the event to the notification collaborator
    async fn publish(&self, event: &ReactionEvent) -> RepoResult<()>;
}
