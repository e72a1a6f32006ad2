//! # like-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, CacheBackend, CacheConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, RateLimitConfig, ReconcileConfig, RedisConfig, ServerConfig, SyncConfig,
};
pub use error::{domain_status, AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
