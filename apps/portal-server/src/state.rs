//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;

use academy_core::access::AccessGate;
use academy_core::ports::{
    DocumentStore, ExplanationService, PasswordService, RateLimiter, TokenService,
};
use academy_infra::{
    Argon2PasswordService, GeminiAssistant, GeminiConfig, InMemoryDocumentStore,
    InMemoryRateLimiter, JwtTokenService, RestDocumentStore, RestStoreConfig,
    UnavailableAssistant,
};

use crate::config::{AccessCode, AppConfig};
use crate::portal::PortalService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub portal: PortalService,
    pub tokens: Arc<dyn TokenService>,
    pub limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build every adapter from the environment and start mirroring the store.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match RestStoreConfig::from_env() {
            Some(store_config) => {
                tracing::info!(url = %store_config.base_url, "Using remote document store");
                Arc::new(RestDocumentStore::new(store_config))
            }
            None => {
                tracing::warn!("STORE_URL not set. Running with an in-memory store.");
                Arc::new(InMemoryDocumentStore::new())
            }
        };

        let argon2 = Argon2PasswordService::from_env().context("access code hashing")?;
        let admin_hash = code_hash(&argon2, &config.admin_code).context("admin access code")?;
        let member_hash = code_hash(&argon2, &config.member_code).context("member access code")?;
        let passwords: Arc<dyn PasswordService> = Arc::new(argon2);
        let gate = AccessGate::new(config.admin_username.clone(), admin_hash, member_hash, passwords);

        let assistant: Arc<dyn ExplanationService> = match GeminiConfig::from_env() {
            Some(assistant_config) => {
                tracing::info!(model = %assistant_config.model, "Explanation assistant enabled");
                Arc::new(GeminiAssistant::new(assistant_config))
            }
            None => {
                tracing::warn!("No assistant API key configured");
                Arc::new(UnavailableAssistant)
            }
        };

        let portal = PortalService::new(store, gate, assistant);
        portal.start().await.context("initial store load")?;

        tracing::info!("Application state initialized");

        Ok(Self {
            portal,
            tokens: Arc::new(JwtTokenService::from_env()),
            limiter: Arc::new(InMemoryRateLimiter::from_env()),
        })
    }
}

fn code_hash(passwords: &Argon2PasswordService, code: &AccessCode) -> anyhow::Result<String> {
    match code {
        AccessCode::Hashed(hash) => {
            passwords.check_hash(hash)?;
            Ok(hash.clone())
        }
        AccessCode::Plain(plain) => Ok(passwords.hash(plain)?),
    }
}
