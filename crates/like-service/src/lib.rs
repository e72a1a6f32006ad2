//! # like-service
//!
//! Application layer of the reaction engine: the toggle use case, the
//! write-behind sync of pending jobs, the reconciliation sweep, and the
//! lifecycle of the background tasks that drive them.

pub mod dto;
pub mod services;
pub mod tasks;

pub use dto::{
    HealthChecks, HealthResponse, LikeCountResponse, ReadinessResponse, ToggleLikeRequest,
};
pub use services::{LikeService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
pub use tasks::{
    EngineSettings, FlushReport, LikeCountReconciler, LikeEngine, OverlapGuard, PendingQueue,
    SweepReport, SyncScheduler, TypeSweep,
};
