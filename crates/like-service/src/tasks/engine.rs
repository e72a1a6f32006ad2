//! Lifecycle of the background flush and sweep loops

use std::sync::Arc;
use std::time::Duration;

use like_common::AppConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::services::ServiceContext;

use super::reconciler::LikeCountReconciler;
use super::scheduler::{FlushReport, SyncScheduler};

/// Timing of the background loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub flush_interval: Duration,
    pub reconcile_enabled: bool,
    pub reconcile_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(30),
            reconcile_enabled: true,
            reconcile_interval: Duration::from_secs(30),
        }
    }
}

impl From<&AppConfig> for EngineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            flush_interval: config.sync.flush_interval(),
            reconcile_enabled: config.reconciliation.enabled,
            reconcile_interval: config.reconciliation.interval(),
        }
    }
}

/// Handle to the running background tasks
///
/// Call [`LikeEngine::shutdown`] to stop the loops and flush what is left.
/// Dropping the handle only signals the loops to stop.
pub struct LikeEngine {
    scheduler: Arc<SyncScheduler>,
    reconciler: Arc<LikeCountReconciler>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl LikeEngine {
    /// Spawn the flush loop and, when enabled, the sweep loop
    pub fn start(ctx: &ServiceContext, settings: &EngineSettings) -> Self {
        let scheduler = Arc::new(SyncScheduler::new(ctx));
        let reconciler = Arc::new(LikeCountReconciler::new(ctx));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let mut tasks = vec![tokio::spawn(run_flush_loop(
            Arc::clone(&scheduler),
            settings.flush_interval,
            shutdown_rx.clone(),
        ))];

        if settings.reconcile_enabled {
            tasks.push(tokio::spawn(run_sweep_loop(
                Arc::clone(&reconciler),
                settings.reconcile_interval,
                shutdown_rx,
            )));
        }

        info!(
            flush_interval_secs = settings.flush_interval.as_secs(),
            batch_threshold = ctx.queue().batch_threshold(),
            reconcile_enabled = settings.reconcile_enabled,
            reconcile_interval_secs = settings.reconcile_interval.as_secs(),
            "Like engine started"
        );

        Self {
            scheduler,
            reconciler,
            shutdown,
            tasks,
        }
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    pub fn reconciler(&self) -> &LikeCountReconciler {
        &self.reconciler
    }

    /// Stop both loops, wait for them, then flush the remaining jobs
    pub async fn shutdown(mut self) -> FlushReport {
        self.shutdown.send_replace(true);

        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                error!(error = %e, "Background task ended abnormally");
            }
        }

        let report = self.scheduler.flush().await;
        info!(
            written = report.written,
            failed = report.failed,
            "Like engine stopped"
        );
        report
    }
}

impl Drop for LikeEngine {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

impl std::fmt::Debug for LikeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeEngine")
            .field("scheduler", &self.scheduler)
            .field("reconciler", &self.reconciler)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// True once the loop should exit
fn stop_requested(changed: Result<(), watch::error::RecvError>, rx: &watch::Receiver<bool>) -> bool {
    changed.is_err() || *rx.borrow()
}

async fn run_flush_loop(
    scheduler: Arc<SyncScheduler>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = scheduler.queue().threshold_reached() => {
                // A permit stored before the last drain is stale
                let queue = scheduler.queue();
                if queue.pushed_since_drain() < queue.batch_threshold() {
                    continue;
                }
            }
            changed = shutdown.changed() => {
                if stop_requested(changed, &shutdown) {
                    break;
                }
                continue;
            }
        }

        scheduler.flush().await;
        // The interval counts from the end of the last flush
        ticker.reset();
    }
}

async fn run_sweep_loop(
    reconciler: Arc<LikeCountReconciler>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                if stop_requested(changed, &shutdown) {
                    break;
                }
                continue;
            }
        }

        reconciler.sweep().await;
    }
}
