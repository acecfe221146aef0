//! Document store port - abstraction over the hierarchical JSON store.
//!
//! Paths are `/`-separated keys into one JSON tree (`projects/-Nab/likes`).

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

use crate::error::StoreError;

/// Value at a path, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub path: String,
    pub value: Value,
}

/// Handler invoked with every snapshot of a subscribed path.
pub type SnapshotHandler =
    Box<dyn Fn(Snapshot) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Box an async closure as a [`SnapshotHandler`].
pub fn snapshot_handler<F, Fut>(f: F) -> SnapshotHandler
where
    F: Fn(Snapshot) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(move |snapshot| -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(f(snapshot))
    })
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`. Missing paths read as `Value::Null`.
    async fn get(&self, path: &str) -> Result<Value, StoreError>;

    /// Replace the value at `path`.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Merge `fields` into the object at `path`, leaving other children alone.
    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError>;

    /// Store `value` under a freshly generated child key of `path` and
    /// return that key. Keys sort in creation order.
    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError>;

    /// Delete the value at `path`.
    async fn remove(&self, path: &str) -> Result<(), StoreError>;

    /// Deliver the current value at `path` to `handler` before returning,
    /// then again after every change under it.
    async fn subscribe(
        &self,
        path: &str,
        handler: SnapshotHandler,
    ) -> Result<SubscriptionId, StoreError>;

    /// Stop a subscription. Unknown ids are ignored.
    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError>;
}

/// Split a store path into its non-empty segments.
pub fn path_segments(path: &str) -> Result<Vec<&str>, StoreError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments
        .iter()
        .any(|s| s.contains(['.', '#', '$', '[', ']']))
    {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments("/projects/p1/").unwrap(), vec!["projects", "p1"]);
        assert!(path_segments("").unwrap().is_empty());
        assert!(path_segments("projects/a.b").is_err());
    }
}
