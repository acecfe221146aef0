//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod assistant;
mod auth;
mod document_store;
mod rate_limit;

pub use assistant::ExplanationService;
pub use auth::{AuthError, PasswordService, SessionClaims, TokenService};
pub use document_store::{
    DocumentStore, Snapshot, SnapshotHandler, SubscriptionId, path_segments, snapshot_handler,
};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
