//! Pending sync job queue
//!
//! Jobs are keyed by ReactionKey in insertion order. A newer job for a key
//! replaces the older one in place, so a drain yields one job per key.

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashSet;

use like_core::{PendingSyncJob, ReactionKey, ResourceKey};
use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct QueueState {
    jobs: IndexMap<ReactionKey, PendingSyncJob>,
    /// Jobs pushed since the last drain, before collapsing
    pushed: usize,
}

/// Queue shared by toggle calls (producers) and the sync scheduler (consumer)
#[derive(Debug)]
pub struct PendingQueue {
    state: Mutex<QueueState>,
    threshold_reached: Notify,
    batch_threshold: usize,
}

impl PendingQueue {
    /// `batch_threshold` is clamped to at least 1
    pub fn new(batch_threshold: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            threshold_reached: Notify::new(),
            batch_threshold: batch_threshold.max(1),
        }
    }

    pub fn batch_threshold(&self) -> usize {
        self.batch_threshold
    }

    /// Enqueue a job, collapsing onto any pending job for the same key.
    /// Returns the number of jobs pushed since the last drain.
    pub fn push(&self, job: PendingSyncJob) -> usize {
        let pushed = {
            let mut state = self.state.lock();
            state.pushed += 1;
            match state.jobs.entry(job.key()) {
                Entry::Occupied(mut pending) => pending.get_mut().absorb(job),
                Entry::Vacant(slot) => {
                    slot.insert(job);
                }
            }
            state.pushed
        };

        if pushed >= self.batch_threshold {
            self.threshold_reached.notify_one();
        }
        pushed
    }

    /// Take every pending job. Pushes racing with the drain land in the
    /// fresh map and wait for the next flush.
    pub fn drain(&self) -> Vec<PendingSyncJob> {
        let jobs = {
            let mut state = self.state.lock();
            state.pushed = 0;
            std::mem::take(&mut state.jobs)
        };
        jobs.into_values().collect()
    }

    /// Put back jobs whose write failed. A key that received a newer job
    /// meanwhile keeps the newer one.
    pub fn requeue(&self, jobs: Vec<PendingSyncJob>) {
        let mut state = self.state.lock();
        for job in jobs {
            match state.jobs.entry(job.key()) {
                Entry::Occupied(mut newer) => {
                    let newer = newer.get_mut();
                    newer.is_first_reaction |= job.is_first_reaction;
                    newer.created_at = newer.created_at.min(job.created_at);
                }
                Entry::Vacant(slot) => {
                    slot.insert(job);
                }
            }
        }
    }

    /// Distinct keys waiting to be flushed
    pub fn len(&self) -> usize {
        self.state.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().jobs.is_empty()
    }

    /// Resources with at least one job waiting to be flushed
    pub fn pending_resources(&self) -> HashSet<ResourceKey> {
        self.state.lock().jobs.values().map(PendingSyncJob::resource).collect()
    }

    /// Jobs pushed since the last drain
    pub fn pushed_since_drain(&self) -> usize {
        self.state.lock().pushed
    }

    /// Resolves once a push reaches the batch threshold
    pub async fn threshold_reached(&self) {
        self.threshold_reached.notified().await;
    }
}
