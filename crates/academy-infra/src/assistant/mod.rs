//! Explanation assistant backends.

use async_trait::async_trait;

use academy_core::ports::ExplanationService;

#[cfg(feature = "assistant")]
mod gemini;

#[cfg(feature = "assistant")]
pub use gemini::{GeminiAssistant, GeminiConfig};

pub const NO_KEY_MESSAGE: &str = "AI Assistant is currently unavailable (No API Key).";
pub const EMPTY_REPLY_MESSAGE: &str = "I couldn't generate an explanation at this time.";
pub const FAILURE_MESSAGE: &str = "An error occurred while communicating with the AI assistant.";

/// Stand-in used when no API key is configured.
pub struct UnavailableAssistant;

#[async_trait]
impl ExplanationService for UnavailableAssistant {
    async fn explain(&self, _topic: &str, _context: &str) -> String {
        NO_KEY_MESSAGE.to_string()
    }
}
