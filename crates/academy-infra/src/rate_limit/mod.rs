//! Login throttling.

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};
