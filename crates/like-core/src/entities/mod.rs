//! Domain entities - reaction keys, cached state, sync jobs, and durable rows

mod reaction;
mod resource;
mod sync_job;

pub use reaction::{CountDelta, ReactionKey, ReactionState, ResourceKey, ToggleResult};
pub use resource::ResolvedResource;
pub use sync_job::{PendingSyncJob, ReactionRow, UpsertOutcome};
