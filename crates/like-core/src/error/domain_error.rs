//! Domain errors - error types for the reaction engine

use thiserror::Error;

use crate::value_objects::{EntityId, ResourceType};

/// Domain layer errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: ResourceType,
        resource_id: EntityId,
    },

    #[error("Actor not found: {0}")]
    ActorNotFound(EntityId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported resource type: {0}")]
    InvalidResourceType(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot react to own content")]
    SelfReactionForbidden,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Event publish error: {0}")]
    PublishError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ResourceNotFound { .. } => "UNKNOWN_RESOURCE",
            Self::ActorNotFound(_) => "UNKNOWN_ACTOR",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidResourceType(_) => "INVALID_RESOURCE_TYPE",

            // Business Rules
            Self::SelfReactionForbidden => "CANNOT_REACT_TO_OWN_CONTENT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::PublishError(_) => "PUBLISH_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. } | Self::ActorNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidResourceType(_)
        )
    }

    /// Check if the actor is not allowed to perform the operation
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::SelfReactionForbidden)
    }

    /// Check if the failure came from an unavailable backing store
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::PublishError(_)
        )
    }
}
