//! Session token and access-code hashing ports.

use uuid::Uuid;

use crate::domain::Role;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub session_id: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: i64,
}

pub trait TokenService: Send + Sync {
    /// Issue a token for an established session.
    fn issue(&self, session_id: Uuid, username: &str, role: Role) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Access-code hashing service.
pub trait PasswordService: Send + Sync {
    fn hash(&self, code: &str) -> Result<String, AuthError>;

    fn verify(&self, code: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
