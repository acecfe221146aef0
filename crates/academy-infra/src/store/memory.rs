//! In-memory document store.
//!
//! Holds the whole tree in one `serde_json::Value`. Used when no remote
//! store is configured and throughout the tests. Works within a single
//! process only.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use academy_core::error::StoreError;
use academy_core::ports::{DocumentStore, Snapshot, SnapshotHandler, SubscriptionId, path_segments};

/// Everything needed to hand one subscriber a fresh snapshot.
#[derive(Clone)]
struct Delivery {
    root: Arc<RwLock<Value>>,
    path: String,
    segments: Vec<String>,
    handler: Arc<SnapshotHandler>,
    /// Keeps snapshots of one subscription in order.
    serial: Arc<Mutex<()>>,
}

impl Delivery {
    async fn deliver(&self) {
        let _turn = self.serial.lock().await;
        let value = {
            let root = self.root.read().await;
            let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();
            read_at(&root, &segments)
        };
        (self.handler)(Snapshot {
            path: self.path.clone(),
            value,
        })
        .await;
    }
}

struct Subscriber {
    segments: Vec<String>,
    changed: watch::Sender<u64>,
    task: JoinHandle<()>,
}

pub struct InMemoryDocumentStore {
    root: Arc<RwLock<Value>>,
    subscribers: RwLock<HashMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_data(Value::Null)
    }

    /// Start from an existing tree.
    pub fn with_data(root: Value) -> Self {
        Self {
            root: Arc::new(RwLock::new(root)),
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Wake every subscriber whose subtree overlaps `segments`.
    async fn notify(&self, segments: &[&str]) {
        let subscribers = self.subscribers.read().await;
        for sub in subscribers.values() {
            let overlaps = sub
                .segments
                .iter()
                .zip(segments)
                .all(|(a, b)| a.as_str() == *b);
            if overlaps {
                sub.changed.send_modify(|version| *version += 1);
            }
        }
    }

    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let segments = path_segments(path)?;
        {
            let mut root = self.root.write().await;
            write_at(&mut root, &segments, value);
        }
        self.notify(&segments).await;
        Ok(())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read_at(node: &Value, segments: &[&str]) -> Value {
    let mut current = node;
    for segment in segments {
        let next = match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(child) => current = child,
            None => return Value::Null,
        }
    }
    current.clone()
}

/// Write `value` at `segments`, creating parents as needed. Writing null
/// deletes, and parents left empty are pruned. Numeric segments address
/// array elements; any other key turns an array into an object keyed by
/// position.
fn write_at(node: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if let Value::Array(items) = node {
        let index = head.parse::<usize>().ok().filter(|i| *i <= items.len());
        match index {
            Some(index) => {
                if index == items.len() {
                    if value.is_null() {
                        return;
                    }
                    items.push(Value::Null);
                }
                let item = &mut items[index];
                write_at(item, rest, value);
                if item.as_object().is_some_and(Map::is_empty) {
                    *item = Value::Null;
                }
                if items.iter().all(Value::is_null) {
                    *node = Value::Null;
                }
                return;
            }
            None if value.is_null() => return,
            None => {
                let keyed = std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .filter(|(_, item)| !item.is_null())
                    .map(|(i, item)| (i.to_string(), item))
                    .collect();
                *node = Value::Object(keyed);
            }
        }
    }

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };
    if value.is_null() && !map.contains_key(*head) {
        return;
    }

    let child = map.entry(head.to_string()).or_insert(Value::Null);
    write_at(child, rest, value);
    if child.is_null() || child.as_object().is_some_and(Map::is_empty) {
        map.remove(*head);
    }
    if map.is_empty() {
        *node = Value::Null;
    }
}

/// Time-ordered child key for `push`.
fn push_key() -> String {
    format!("-{}", Uuid::now_v7().simple())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        let segments = path_segments(path)?;
        let root = self.root.read().await;
        Ok(read_at(&root, &segments))
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.write(path, value).await
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let base = path_segments(path)?;
        // Reject bad keys before any field is written.
        for key in fields.keys() {
            path_segments(key)?;
        }
        {
            let mut root = self.root.write().await;
            for (key, value) in fields {
                let mut segments = base.clone();
                segments.extend(path_segments(&key)?);
                write_at(&mut root, &segments, value);
            }
        }
        self.notify(&base).await;
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError> {
        let key = push_key();
        self.write(&format!("{path}/{key}"), value).await?;
        Ok(key)
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.write(path, Value::Null).await
    }

    async fn subscribe(
        &self,
        path: &str,
        handler: SnapshotHandler,
    ) -> Result<SubscriptionId, StoreError> {
        let segments: Vec<String> = path_segments(path)?
            .into_iter()
            .map(str::to_string)
            .collect();
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (changed, mut receiver) = watch::channel(0u64);
        let delivery = Delivery {
            root: Arc::clone(&self.root),
            path: path.to_string(),
            segments: segments.clone(),
            handler: Arc::new(handler),
            serial: Arc::new(Mutex::new(())),
        };

        let task_delivery = delivery.clone();
        let task = tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                task_delivery.deliver().await;
            }
        });
        self.subscribers.write().await.insert(
            id,
            Subscriber {
                segments,
                changed,
                task,
            },
        );

        delivery.deliver().await;
        tracing::debug!(path = %path, subscription = id.0, "Subscribed to store path");
        Ok(id)
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError> {
        if let Some(sub) = self.subscribers.write().await.remove(&id) {
            sub.task.abort();
            tracing::debug!(subscription = id.0, "Unsubscribed from store path");
        }
        Ok(())
    }
}
