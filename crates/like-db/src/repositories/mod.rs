//! Repository implementations
//!
//! PostgreSQL implementations of the durable-store ports defined in like-core.

mod actor;
mod error;
mod reaction;
mod resource;
mod tables;

pub use actor::PgActorRepository;
pub use reaction::PgReactionStore;
pub use resource::PgResourceResolver;
