//! Request DTOs for API endpoints

use like_core::{DomainError, EntityId, ResourceType};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Toggle like request
///
/// The resource type stays a string here so an unknown tag is reported as
/// `INVALID_RESOURCE_TYPE` rather than a generic body rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    #[validate(length(min = 1, max = 16, message = "Resource type must be 1-16 characters"))]
    pub resource_type: String,

    #[validate(custom(function = "validate_positive_id"))]
    pub resource_id: EntityId,
}

impl ToggleLikeRequest {
    pub fn resource_type(&self) -> Result<ResourceType, DomainError> {
        self.resource_type.parse()
    }
}

fn validate_positive_id(id: &EntityId) -> Result<(), ValidationError> {
    if id.into_inner() > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive_id");
        err.message = Some("Resource id must be positive".into());
        Err(err)
    }
}
