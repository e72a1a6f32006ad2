//! Ports implemented by the infrastructure crates

mod cache;
mod publisher;
mod repositories;

pub use cache::{LikeCounter, ReactionCache};
pub use publisher::EventPublisher;
pub use repositories::{ActorRepository, ReactionStore, RepoResult, ResourceResolver};
