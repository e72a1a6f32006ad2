//! Axum extractors for request handling

mod actor;
mod validated;

pub use actor::{ActorId, ACTOR_ID_HEADER};
pub use validated::ValidatedJson;
