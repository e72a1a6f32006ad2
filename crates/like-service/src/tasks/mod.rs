//! Background work: the write-behind sync and the reconciliation sweep

mod engine;
mod guard;
mod queue;
mod reconciler;
mod scheduler;

pub use engine::{EngineSettings, LikeEngine};
pub use guard::{OverlapGuard, OverlapPermit};
pub use queue::PendingQueue;
pub use reconciler::{LikeCountReconciler, SweepReport, TypeSweep};
pub use scheduler::{FlushReport, SyncScheduler};
