//! Gemini-backed explanation assistant.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use academy_core::ports::ExplanationService;

use super::{EMPTY_REPLY_MESSAGE, FAILURE_MESSAGE};

const SYSTEM_INSTRUCTION: &str = "You are a STEM Academy educational assistant. Keep your explanations professional, encouraging, and easy for students to understand.";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl GeminiConfig {
    /// Read `GEMINI_API_KEY` (or `API_KEY`) and `GEMINI_MODEL`.
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.is_empty())?;
        Some(Self {
            api_key,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
            temperature: 0.7,
            top_p: 0.95,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, or `None` when it is empty.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn prompt(topic: &str, context: &str) -> String {
    format!("Explain the following topic: \"{topic}\" within the context of this project: \"{context}\".")
}

pub struct GeminiAssistant {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn generate(&self, topic: &str, context: &str) -> Result<GenerateResponse, reqwest::Error> {
        let prompt = prompt(topic, context);
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        self.client
            .post(format!(
                "{API_BASE}/models/{}:generateContent",
                self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await
    }
}

#[async_trait]
impl ExplanationService for GeminiAssistant {
    async fn explain(&self, topic: &str, context: &str) -> String {
        match self.generate(topic, context).await {
            Ok(response) => response
                .text()
                .unwrap_or_else(|| EMPTY_REPLY_MESSAGE.to_string()),
            Err(e) => {
                tracing::error!(error = %e, "Gemini request failed");
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_wording() {
        assert_eq!(
            prompt("PWM", "Smart Garden"),
            "Explain the following topic: \"PWM\" within the context of this project: \"Smart Garden\"."
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "PWM is "}, {"text": "pulsing."}]}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("PWM is pulsing."));
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(response.text().is_none());

        let blank: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}]
        }))
        .unwrap();
        assert!(blank.text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "sys" }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 0.25,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "systemInstruction": {"parts": [{"text": "sys"}]},
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "generationConfig": {"temperature": 0.5, "topP": 0.25}
            })
        );
    }
}
