//! Write-behind sync of pending jobs to the durable store

use std::sync::Arc;

use indexmap::IndexMap;
use like_core::traits::ReactionStore;
use like_core::{PendingSyncJob, ReactionRow, ResourceKey};
use tracing::{debug, info, instrument, warn};

use crate::services::ServiceContext;

use super::guard::OverlapGuard;
use super::queue::PendingQueue;

/// Outcome of one flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Distinct jobs drained from the queue
    pub jobs: usize,
    /// Jobs written to the durable store
    pub written: usize,
    /// Written jobs that carried an actor's first like on the resource
    pub first_reactions: usize,
    /// Jobs put back on the queue after a failed write
    pub failed: usize,
    /// Set when another flush was already running
    pub skipped: bool,
}

impl FlushReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: FlushReport) {
        self.jobs += other.jobs;
        self.written += other.written;
        self.first_reactions += other.first_reactions;
        self.failed += other.failed;
        self.skipped |= other.skipped;
    }
}

/// Drains the pending queue into the durable store
pub struct SyncScheduler {
    store: Arc<dyn ReactionStore>,
    queue: Arc<PendingQueue>,
    guard: OverlapGuard,
}

impl SyncScheduler {
    pub fn new(ctx: &ServiceContext) -> Self {
        Self::with_parts(ctx.shared_store(), ctx.shared_queue())
    }

    pub fn with_parts(store: Arc<dyn ReactionStore>, queue: Arc<PendingQueue>) -> Self {
        Self {
            store,
            queue,
            guard: OverlapGuard::new(),
        }
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    /// Flush every pending job, one durable batch per resource
    ///
    /// A failed batch is requeued without affecting the other resources.
    #[instrument(skip(self))]
    pub async fn flush(&self) -> FlushReport {
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("Flush already running, skipping");
            return FlushReport::skipped();
        };

        let jobs = self.queue.drain();
        if jobs.is_empty() {
            return FlushReport::default();
        }

        let mut report = FlushReport {
            jobs: jobs.len(),
            ..FlushReport::default()
        };

        let mut batches: IndexMap<ResourceKey, Vec<PendingSyncJob>> = IndexMap::new();
        for job in jobs {
            batches.entry(job.resource()).or_default().push(job);
        }

        for (resource, batch) in batches {
            let rows: Vec<ReactionRow> = batch.iter().map(ReactionRow::from_job).collect();

            match self.store.upsert_reactions(&rows).await {
                Ok(outcomes) => {
                    report.written += rows.len();
                    report.first_reactions += batch.iter().filter(|j| j.is_first_reaction).count();
                    let delta: i64 = outcomes
                        .iter()
                        .zip(&rows)
                        .map(|(outcome, row)| outcome.like_delta(row.active))
                        .sum();
                    self.adjust_aggregate(resource, delta).await;
                }
                Err(e) => {
                    warn!(
                        resource_type = %resource.resource_type,
                        resource_id = %resource.resource_id,
                        jobs = batch.len(),
                        error = %e,
                        "Durable write failed, requeueing jobs"
                    );
                    report.failed += batch.len();
                    self.queue.requeue(batch);
                }
            }
        }

        info!(
            jobs = report.jobs,
            written = report.written,
            first_reactions = report.first_reactions,
            failed = report.failed,
            "Flushed pending likes"
        );
        report
    }

    /// Best-effort aggregate bump; the reconciler corrects any miss
    async fn adjust_aggregate(&self, resource: ResourceKey, delta: i64) {
        if delta == 0 {
            return;
        }
        if let Err(e) = self
            .store
            .adjust_aggregate_count(resource.resource_type, resource.resource_id, delta)
            .await
        {
            warn!(
                resource_type = %resource.resource_type,
                resource_id = %resource.resource_id,
                delta,
                error = %e,
                "Aggregate adjustment failed"
            );
        }
    }
}

impl std::fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("pending_jobs", &self.queue.len())
            .field("running", &self.guard.is_running())
            .finish()
    }
}
