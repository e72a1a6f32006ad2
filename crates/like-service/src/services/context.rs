//! Service context - dependency container for services
//!
//! Holds every collaborator port and the shared pending-job queue.

use std::sync::Arc;

use like_core::traits::{
    ActorRepository, EventPublisher, ReactionCache, ReactionStore, ResourceResolver,
};

use crate::tasks::PendingQueue;

use super::error::{ServiceError, ServiceResult};

/// Default raw job count that triggers an early flush
pub const DEFAULT_BATCH_THRESHOLD: usize = 5;

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same collaborators and queue.
#[derive(Clone)]
pub struct ServiceContext {
    // Durable store collaborators
    resolver: Arc<dyn ResourceResolver>,
    actor_repo: Arc<dyn ActorRepository>,
    store: Arc<dyn ReactionStore>,

    // Reaction Cache
    cache: Arc<dyn ReactionCache>,

    // Notification hand-off
    publisher: Arc<dyn EventPublisher>,

    // Write-behind queue shared by toggles and the sync scheduler
    queue: Arc<PendingQueue>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        resolver: Arc<dyn ResourceResolver>,
        actor_repo: Arc<dyn ActorRepository>,
        store: Arc<dyn ReactionStore>,
        cache: Arc<dyn ReactionCache>,
        publisher: Arc<dyn EventPublisher>,
        queue: Arc<PendingQueue>,
    ) -> Self {
        Self {
            resolver,
            actor_repo,
            store,
            cache,
            publisher,
            queue,
        }
    }

    // === Repositories ===

    pub fn resolver(&self) -> &dyn ResourceResolver {
        self.resolver.as_ref()
    }

    pub fn actor_repo(&self) -> &dyn ActorRepository {
        self.actor_repo.as_ref()
    }

    pub fn store(&self) -> &dyn ReactionStore {
        self.store.as_ref()
    }

    /// Owned handle to the store for background tasks
    pub fn shared_store(&self) -> Arc<dyn ReactionStore> {
        Arc::clone(&self.store)
    }

    // === Cache ===

    pub fn cache(&self) -> &dyn ReactionCache {
        self.cache.as_ref()
    }

    /// Owned handle to the cache for background tasks
    pub fn shared_cache(&self) -> Arc<dyn ReactionCache> {
        Arc::clone(&self.cache)
    }

    // === Pub/Sub ===

    /// Owned handle to the publisher for detached publish tasks
    pub fn shared_publisher(&self) -> Arc<dyn EventPublisher> {
        Arc::clone(&self.publisher)
    }

    // === Queue ===

    pub fn queue(&self) -> &PendingQueue {
        self.queue.as_ref()
    }

    pub fn shared_queue(&self) -> Arc<PendingQueue> {
        Arc::clone(&self.queue)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("cache", &"ReactionCache")
            .field("pending_jobs", &self.queue.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    resolver: Option<Arc<dyn ResourceResolver>>,
    actor_repo: Option<Arc<dyn ActorRepository>>,
    store: Option<Arc<dyn ReactionStore>>,
    cache: Option<Arc<dyn ReactionCache>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    batch_threshold: usize,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            resolver: None,
            actor_repo: None,
            store: None,
            cache: None,
            publisher: None,
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
        }
    }

    pub fn resolver(mut self, resolver: Arc<dyn ResourceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn actor_repo(mut self, repo: Arc<dyn ActorRepository>) -> Self {
        self.actor_repo = Some(repo);
        self
    }

    pub fn store(mut self, store: Arc<dyn ReactionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn ReactionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn batch_threshold(mut self, threshold: usize) -> Self {
        self.batch_threshold = threshold;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    /// or the batch threshold is zero
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.batch_threshold == 0 {
            return Err(ServiceError::validation("batch_threshold must be at least 1"));
        }

        Ok(ServiceContext::new(
            self.resolver
                .ok_or_else(|| ServiceError::validation("resolver is required"))?,
            self.actor_repo
                .ok_or_else(|| ServiceError::validation("actor_repo is required"))?,
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.cache
                .ok_or_else(|| ServiceError::validation("cache is required"))?,
            self.publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
            Arc::new(PendingQueue::new(self.batch_threshold)),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
