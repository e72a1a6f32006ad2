//! # like-db
//!
//! Database layer implementing the durable-store ports with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers
//! - `PgReactionStore`, `PgResourceResolver`, `PgActorRepository`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use like_db::{create_pool, run_migrations, DatabaseConfig, PgReactionStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!     let store = PgReactionStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgActorRepository, PgReactionStore, PgResourceResolver};
