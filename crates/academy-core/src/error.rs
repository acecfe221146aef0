//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid Security Code. Contact Instructor.")]
    InvalidCredentials,

    #[error("Session is not active")]
    Unauthorized,

    #[error("Insufficient permissions: {0}")]
    Forbidden(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn project_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            id: id.into(),
        }
    }

    pub fn post_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "CommunityPost",
            id: id.into(),
        }
    }

    pub fn comment_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Comment",
            id: id.into(),
        }
    }
}

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    #[error("Store request failed: {0}")]
    Request(String),

    #[error("Store returned malformed data: {0}")]
    Malformed(String),

    #[error("Subscription failed: {0}")]
    Subscribe(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Internal(err.to_string())
    }
}
