//! Periodic recomputation of aggregate like counts
//!
//! Pass one corrects every resource with at least one active like. Pass two
//! zeroes resources whose likes were all removed, which the grouped count
//! never reports. The true counts are then pushed into warm cached counts of
//! resources with nothing left to flush.

use std::sync::Arc;

use like_core::traits::{ReactionCache, ReactionStore};
use like_core::{DomainError, EntityId, ResourceKey, ResourceType};
use tracing::{debug, error, info, instrument, warn};

use crate::services::ServiceContext;

use super::guard::OverlapGuard;
use super::queue::PendingQueue;

/// Result of sweeping one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSweep {
    pub resource_type: ResourceType,
    /// Resources with at least one active like
    pub resources: usize,
    /// Aggregates rewritten to the true count
    pub corrected: usize,
    /// Aggregates reset to zero
    pub reset: usize,
    /// Cached counts overwritten with the true count
    pub cache_corrected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub types: Vec<TypeSweep>,
    /// Types whose sweep failed and will be retried on the next run
    pub failed: Vec<ResourceType>,
    pub skipped: bool,
}

impl SweepReport {
    pub fn for_type(&self, resource_type: ResourceType) -> Option<&TypeSweep> {
        self.types.iter().find(|t| t.resource_type == resource_type)
    }

    pub fn corrected(&self) -> usize {
        self.types.iter().map(|t| t.corrected).sum()
    }

    pub fn reset(&self) -> usize {
        self.types.iter().map(|t| t.reset).sum()
    }

    pub fn cache_corrected(&self) -> usize {
        self.types.iter().map(|t| t.cache_corrected).sum()
    }
}

/// Rebuilds aggregate counts from the likes table and realigns cached counts
pub struct LikeCountReconciler {
    store: Arc<dyn ReactionStore>,
    cache: Arc<dyn ReactionCache>,
    queue: Arc<PendingQueue>,
    guard: OverlapGuard,
}

impl LikeCountReconciler {
    pub fn new(ctx: &ServiceContext) -> Self {
        Self::with_parts(ctx.shared_store(), ctx.shared_cache(), ctx.shared_queue())
    }

    pub fn with_parts(
        store: Arc<dyn ReactionStore>,
        cache: Arc<dyn ReactionCache>,
        queue: Arc<PendingQueue>,
    ) -> Self {
        Self {
            store,
            cache,
            queue,
            guard: OverlapGuard::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn sweep(&self) -> SweepReport {
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("Sweep already running, skipping");
            return SweepReport {
                skipped: true,
                ..SweepReport::default()
            };
        };

        let mut report = SweepReport::default();
        for resource_type in ResourceType::ALL {
            match self.sweep_type(resource_type).await {
                Ok(sweep) => report.types.push(sweep),
                Err(e) => {
                    error!(resource_type = %resource_type, error = %e, "Like count sweep failed");
                    report.failed.push(resource_type);
                }
            }
        }

        info!(
            corrected = report.corrected(),
            reset = report.reset(),
            cache_corrected = report.cache_corrected(),
            failed = report.failed.len(),
            "Like count sweep complete"
        );
        report
    }

    async fn sweep_type(&self, resource_type: ResourceType) -> Result<TypeSweep, DomainError> {
        let counts = self.store.count_active_grouped(resource_type).await?;

        let mut corrected = 0;
        let mut true_counts: Vec<(EntityId, i64)> = Vec::with_capacity(counts.len());
        for (resource_id, count) in counts {
            if self
                .store
                .update_aggregate_count(resource_type, resource_id, count)
                .await?
            {
                debug!(resource_type = %resource_type, resource_id = %resource_id, count, "Corrected like count");
                corrected += 1;
            }
            true_counts.push((resource_id, count));
        }
        let resources = true_counts.len();

        let with_likes: Vec<EntityId> = true_counts.iter().map(|&(id, _)| id).collect();
        let reset = self
            .store
            .reset_unreacted_counts(resource_type, &with_likes)
            .await?;
        true_counts.extend(reset.iter().map(|&id| (id, 0)));

        let cache_corrected = self.correct_cached_counts(resource_type, &true_counts).await;

        Ok(TypeSweep {
            resource_type,
            resources,
            corrected,
            reset: reset.len(),
            cache_corrected,
        })
    }

    /// Overwrite warm cached counts that drifted from the true count
    ///
    /// A resource with pending jobs is skipped since its cached count is
    /// ahead of the store. Cold counts are seeded on their next use. Cache
    /// failures end the pass without failing the sweep.
    async fn correct_cached_counts(
        &self,
        resource_type: ResourceType,
        true_counts: &[(EntityId, i64)],
    ) -> usize {
        let pending = self.queue.pending_resources();
        let mut corrected = 0;

        for &(resource_id, count) in true_counts {
            let resource = ResourceKey::new(resource_type, resource_id);
            if pending.contains(&resource) {
                continue;
            }

            let result = match self.cache.peek_count(resource).await {
                Ok(Some(cached)) if cached != count => {
                    self.cache.set_count(resource, count).await.map(|()| true)
                }
                Ok(_) => Ok(false),
                Err(e) => Err(e),
            };

            match result {
                Ok(true) => {
                    debug!(resource = %resource, count, "Corrected cached like count");
                    corrected += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(resource_type = %resource_type, error = %e, "Cached count correction stopped");
                    break;
                }
            }
        }
        corrected
    }
}

impl std::fmt::Debug for LikeCountReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeCountReconciler")
            .field("running", &self.guard.is_running())
            .finish()
    }
}
