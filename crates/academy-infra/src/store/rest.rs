//! Document store over a Realtime-Database-style REST API.
//!
//! Every path maps to `{base_url}/{path}.json`. Subscriptions read the path
//! once up front, then poll it and fire only when the returned tree differs
//! from the last one.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use academy_core::error::StoreError;
use academy_core::ports::{DocumentStore, Snapshot, SnapshotHandler, SubscriptionId, path_segments};

#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Database root, e.g. `https://example-default-rtdb.firebaseio.com`.
    pub base_url: String,
    /// Sent as the `auth` query parameter when present.
    pub auth_token: Option<String>,
    pub poll_interval: Duration,
}

impl RestStoreConfig {
    /// Read `STORE_URL`, `STORE_AUTH_TOKEN` and `STORE_POLL_INTERVAL_MS`.
    /// Returns `None` when no URL is configured.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("STORE_URL").ok().filter(|s| !s.is_empty())?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: std::env::var("STORE_AUTH_TOKEN").ok().filter(|s| !s.is_empty()),
            poll_interval: Duration::from_millis(
                std::env::var("STORE_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|ms| *ms > 0)
                    .unwrap_or(2000),
            ),
        })
    }
}

#[derive(Clone)]
struct Endpoint {
    client: reqwest::Client,
    config: Arc<RestStoreConfig>,
}

impl Endpoint {
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let segments = path_segments(path)?;
        let url = format!("{}/{}.json", self.config.base_url, segments.join("/"));
        let builder = self.client.request(method, url);
        Ok(match &self.config.auth_token {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Request(format!("{status}: {body}")));
        }
        Ok(response)
    }

    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

pub struct RestDocumentStore {
    endpoint: Endpoint,
    polls: Mutex<HashMap<SubscriptionId, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl RestDocumentStore {
    pub fn new(config: RestStoreConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: RestStoreConfig) -> Self {
        Self {
            endpoint: Endpoint {
                client,
                config: Arc::new(config),
            },
            polls: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.endpoint.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let builder = self.endpoint.request(Method::PUT, path)?.json(&value);
        self.endpoint.send(builder).await.map(|_| ())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let builder = self.endpoint.request(Method::PATCH, path)?.json(&fields);
        self.endpoint.send(builder).await.map(|_| ())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError> {
        let key = format!("-{}", Uuid::now_v7().simple());
        self.set(&format!("{path}/{key}"), value).await?;
        Ok(key)
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let builder = self.endpoint.request(Method::DELETE, path)?;
        self.endpoint.send(builder).await.map(|_| ())
    }

    async fn subscribe(
        &self,
        path: &str,
        handler: SnapshotHandler,
    ) -> Result<SubscriptionId, StoreError> {
        let initial = self.endpoint.get(path).await?;
        handler(Snapshot {
            path: path.to_string(),
            value: initial.clone(),
        })
        .await;

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let endpoint = self.endpoint.clone();
        let path = path.to_string();

        let task = tokio::spawn(async move {
            let period = endpoint.config.poll_interval;
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            let mut last = initial;
            loop {
                interval.tick().await;
                match endpoint.get(&path).await {
                    Ok(value) if value != last => {
                        last = value.clone();
                        handler(Snapshot {
                            path: path.clone(),
                            value,
                        })
                        .await;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "Store poll failed");
                    }
                }
            }
        });

        self.polls.lock().await.insert(id, task);
        tracing::info!(subscription = id.0, "Polling store path");
        Ok(id)
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError> {
        if let Some(task) = self.polls.lock().await.remove(&id) {
            task.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(auth_token: Option<&str>) -> Endpoint {
        Endpoint {
            client: reqwest::Client::new(),
            config: Arc::new(RestStoreConfig {
                base_url: "https://academy.example.com".to_string(),
                auth_token: auth_token.map(str::to_string),
                poll_interval: Duration::from_secs(1),
            }),
        }
    }

    #[test]
    fn test_request_url() {
        let request = endpoint(None)
            .request(Method::GET, "/projects/p1/")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://academy.example.com/projects/p1.json"
        );
    }

    #[test]
    fn test_request_carries_auth_token() {
        let request = endpoint(Some("secret"))
            .request(Method::PATCH, "communityPosts/k1")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("auth=secret"));
        assert_eq!(request.method(), Method::PATCH);
    }

    #[test]
    fn test_invalid_path_is_rejected_before_sending() {
        assert!(endpoint(None).request(Method::GET, "projects/a#b").is_err());
    }
}
