//! Application configuration loaded from environment variables.

use std::env;

/// How one access code is configured: already hashed, or in plain text to be
/// hashed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessCode {
    Hashed(String),
    Plain(String),
}

impl AccessCode {
    /// `{prefix}_HASH` wins over `{prefix}`; `default` applies when neither is set.
    fn from_env(prefix: &str, default: &str) -> Self {
        if let Some(hash) = non_empty(&format!("{prefix}_HASH")) {
            return AccessCode::Hashed(hash);
        }
        AccessCode::Plain(non_empty(prefix).unwrap_or_else(|| default.to_string()))
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub admin_username: String,
    pub admin_code: AccessCode,
    pub member_code: AccessCode,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            service_name: non_empty("SERVICE_NAME").unwrap_or_else(|| "stem-academy".to_string()),
            admin_username: non_empty("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_code: AccessCode::from_env("ADMIN_ACCESS_CODE", "ADMIN2024"),
            member_code: AccessCode::from_env("MEMBER_ACCESS_CODE", "STEM2024"),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
