//! Explanation assistant port.

use async_trait::async_trait;

/// Generates a short student-facing explanation of a topic.
///
/// Implementations never fail outward: every failure is reported as a
/// fixed explanatory sentence so the caller can show it as-is.
#[async_trait]
pub trait ExplanationService: Send + Sync {
    async fn explain(&self, topic: &str, context: &str) -> String;
}
