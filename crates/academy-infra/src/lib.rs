//! # Academy Infrastructure
//!
//! Concrete implementations of the ports defined in `academy-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `auth` - JWT session tokens + Argon2 access-code hashing
//! - `rate-limit` - Login throttling via governor
//! - `rest-store` - Remote document store over REST
//! - `assistant` - Gemini explanation assistant

pub mod assistant;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use assistant::UnavailableAssistant;
pub use store::InMemoryDocumentStore;

#[cfg(feature = "assistant")]
pub use assistant::{GeminiAssistant, GeminiConfig};
#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
#[cfg(feature = "rest-store")]
pub use store::{RestDocumentStore, RestStoreConfig};
