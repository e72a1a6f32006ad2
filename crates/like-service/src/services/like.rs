//! Like service
//!
//! Toggles an actor's like on a post, comment or reply. The cache is updated
//! synchronously; the durable write is deferred to the sync scheduler. A
//! cold count is seeded from the durable aggregate before it is used.

use chrono::Utc;
use like_core::{
    CountDelta, DomainError, EntityId, PendingSyncJob, ReactionEvent, ReactionState,
    ResolvedResource, ResourceKey, ResourceType, ToggleResult,
};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Like service
pub struct LikeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LikeService<'a> {
    /// Create a new LikeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip the actor's like on a resource
    ///
    /// Every check runs before any mutation, so a rejected toggle leaves the
    /// cache and the queue untouched.
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        actor_id: EntityId,
        resource_type: ResourceType,
        resource_id: EntityId,
    ) -> ServiceResult<ToggleResult> {
        if !self.ctx.actor_repo().exists(actor_id).await? {
            return Err(DomainError::ActorNotFound(actor_id).into());
        }

        let resource = self
            .ctx
            .resolver()
            .resolve(ResourceKey::new(resource_type, resource_id))
            .await?
            .ok_or(DomainError::ResourceNotFound {
                resource_type,
                resource_id,
            })?;

        if resource.is_owned_by(actor_id) {
            return Err(DomainError::SelfReactionForbidden.into());
        }

        let key = resource.key.reaction(actor_id);
        let now = Utc::now();

        let (state, is_first_reaction) = match self.ctx.cache().get_state(key).await? {
            Some(current) => (current.toggled(now), false),
            // Cold cache: the durable row decides between a first like and a
            // re-toggle. A failed lookup rejects the toggle.
            None => match self.ctx.store().find_reaction(key).await? {
                Some(row) => {
                    debug!(key = %key, "Reaction state loaded from store");
                    (ReactionState::from_row(&row).toggled(now), false)
                }
                None => (ReactionState::first(now), true),
            },
        };

        self.ctx.cache().set_state(key, &state).await?;
        let count = match self.apply_count(resource.key, state.active).await {
            Ok(count) => count,
            Err(e) => {
                // No job is enqueued, so the flipped state must not stay cached
                if let Err(undo) = self.ctx.cache().invalidate(key).await {
                    warn!(key = %key, error = %undo, "Failed to drop reaction state");
                }
                return Err(e);
            }
        };

        let job = PendingSyncJob::at(key, state.active, is_first_reaction, now)
            .created(state.created_at.unwrap_or(now));
        let pending = self.ctx.queue().push(job);

        self.publish(&resource, actor_id, state.active, now);

        info!(
            actor_id = %actor_id,
            resource_type = %resource_type,
            resource_id = %resource_id,
            active = state.active,
            count,
            pending,
            "Like toggled"
        );

        Ok(ToggleResult {
            resource_id,
            actor_id,
            resource_type,
            active: state.active,
            count,
            timestamp: now,
        })
    }

    /// Cached like count of a resource
    #[instrument(skip(self))]
    pub async fn count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
    ) -> ServiceResult<i64> {
        let resource = ResourceKey::new(resource_type, resource_id);
        self.warm_count(resource).await?;
        Ok(self.ctx.cache().get_count(resource).await?)
    }

    async fn apply_count(&self, resource: ResourceKey, active: bool) -> ServiceResult<i64> {
        self.warm_count(resource).await?;
        Ok(self
            .ctx
            .cache()
            .increment_count(resource, CountDelta::for_active(active))
            .await?)
    }

    /// Seed a cold count from the durable aggregate
    ///
    /// A failed aggregate read leaves the count cold; the next sweep
    /// corrects whatever it settles on.
    async fn warm_count(&self, resource: ResourceKey) -> ServiceResult<()> {
        if self.ctx.cache().peek_count(resource).await?.is_some() {
            return Ok(());
        }

        match self.ctx.store().aggregate_count(resource).await {
            Ok(Some(aggregate)) => {
                if self.ctx.cache().seed_count(resource, aggregate).await? {
                    debug!(resource = %resource, aggregate, "Like count seeded from store");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(resource = %resource, error = %e, "Failed to read aggregate like count");
            }
        }
        Ok(())
    }

    /// Hand the event to the publisher on a detached task
    fn publish(
        &self,
        resource: &ResolvedResource,
        actor_id: EntityId,
        active: bool,
        now: chrono::DateTime<Utc>,
    ) {
        let event = ReactionEvent::new(resource, actor_id, active, now);
        let publisher = self.ctx.shared_publisher();

        tokio::spawn(async move {
            if let Err(e) = publisher.publish(&event).await {
                warn!(
                    event_type = event.event_type(),
                    owner_id = %event.owner_id,
                    error = %e,
                    "Failed to publish reaction event"
                );
            }
        });
    }
}
