//! Value objects - immutable types that represent domain concepts

mod entity_id;
mod resource_type;

pub use entity_id::{EntityId, EntityIdParseError};
pub use resource_type::ResourceType;
