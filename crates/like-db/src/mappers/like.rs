//! Like model <-> entity mapper

use like_core::entities::{ReactionRow, UpsertOutcome};
use like_core::error::DomainError;
use like_core::value_objects::EntityId;

use crate::models::{LikeModel, UpsertModel};

/// Convert LikeModel to ReactionRow, rejecting unknown type tags
impl TryFrom<LikeModel> for ReactionRow {
    type Error = DomainError;

    fn try_from(model: LikeModel) -> Result<Self, Self::Error> {
        let resource_type = model.resource_type.parse().map_err(|_| {
            DomainError::DatabaseError(format!(
                "unknown resource_type in likes row: {}",
                model.resource_type
            ))
        })?;

        Ok(ReactionRow {
            actor_id: EntityId::new(model.actor_id),
            resource_id: EntityId::new(model.resource_id),
            resource_type,
            active: model.active,
            created_at: model.created_at,
            modified_at: model.modified_at,
        })
    }
}

impl From<UpsertModel> for UpsertOutcome {
    fn from(model: UpsertModel) -> Self {
        match model.was_active {
            None => UpsertOutcome::Inserted,
            Some(was_active) => UpsertOutcome::Updated { was_active },
        }
    }
}
