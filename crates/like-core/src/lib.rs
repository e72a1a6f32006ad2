//! # like-core
//!
//! Domain layer of the reaction engine: identifiers, reaction keys and states,
//! pending sync jobs, domain events, and the ports implemented by the
//! infrastructure crates. No database, cache, or web framework dependencies.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CountDelta, PendingSyncJob, ReactionKey, ReactionRow, ReactionState, ResolvedResource,
    ResourceKey, ToggleResult, UpsertOutcome,
};
pub use error::DomainError;
pub use events::ReactionEvent;
pub use traits::{
    ActorRepository, EventPublisher, LikeCounter, ReactionCache, ReactionStore, RepoResult,
    ResourceResolver,
};
pub use value_objects::{EntityId, EntityIdParseError, ResourceType};
