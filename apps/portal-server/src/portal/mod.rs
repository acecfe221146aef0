//! The portal service: sessions, the snapshot mirror and every user action.
//!
//! Reads are answered from the mirror with the caller's session overlay
//! applied. Counter writes (likes, votes, views) patch the mirror at once and
//! go to the store in the background through one ordered queue; content
//! writes are awaited and followed by a re-read of the affected collection.

mod catalog;
mod community;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock, mpsc};
use uuid::Uuid;

use academy_core::access::AccessGate;
use academy_core::domain::SessionUser;
use academy_core::error::DomainError;
use academy_core::mirror::{Mirror, POSTS_PATH, PROJECTS_PATH};
use academy_core::ports::{
    DocumentStore, ExplanationService, Snapshot, SubscriptionId, snapshot_handler,
};
use academy_core::reconcile::SessionOverlay;

pub use community::VoteOutcome;

/// One logged-in browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub overlay: SessionOverlay,
}

/// A background counter write: merge `fields` into `path`.
struct CounterWrite {
    path: String,
    fields: Map<String, Value>,
}

struct Inner {
    store: Arc<dyn DocumentStore>,
    counter_writes: mpsc::UnboundedSender<CounterWrite>,
    gate: AccessGate,
    assistant: Arc<dyn ExplanationService>,
    mirror: RwLock<Mirror>,
    sessions: RwLock<HashMap<Uuid, Session>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

/// Cheap to clone; all clones share state.
///
/// Lock order is mirror before sessions.
#[derive(Clone)]
pub struct PortalService {
    inner: Arc<Inner>,
}

impl PortalService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        gate: AccessGate,
        assistant: Arc<dyn ExplanationService>,
    ) -> Self {
        let (counter_writes, queue) = mpsc::unbounded_channel();
        tokio::spawn(write_counters(Arc::clone(&store), queue));

        Self {
            inner: Arc::new(Inner {
                store,
                counter_writes,
                gate,
                assistant,
                mirror: RwLock::new(Mirror::new()),
                sessions: RwLock::new(HashMap::new()),
                subscriptions: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Subscribe to both collections. Their current contents are in the
    /// mirror once this returns.
    pub async fn start(&self) -> Result<(), DomainError> {
        let mut subscriptions = self.inner.subscriptions.lock().await;
        for path in [PROJECTS_PATH, POSTS_PATH] {
            let weak = Arc::downgrade(&self.inner);
            let id = self
                .inner
                .store
                .subscribe(
                    path,
                    snapshot_handler(move |snapshot: Snapshot| {
                        let weak: Weak<Inner> = weak.clone();
                        async move {
                            if let Some(inner) = weak.upgrade() {
                                PortalService { inner }.apply_snapshot(snapshot).await;
                            }
                        }
                    }),
                )
                .await?;
            subscriptions.push(id);
        }

        tracing::info!("Portal subscribed to store");
        Ok(())
    }

    /// Release the store subscriptions.
    pub async fn shutdown(&self) {
        let ids: Vec<SubscriptionId> = self.inner.subscriptions.lock().await.drain(..).collect();
        for id in ids {
            if let Err(e) = self.inner.store.unsubscribe(id).await {
                tracing::warn!(error = %e, "Failed to release store subscription");
            }
        }
        tracing::info!("Portal unsubscribed from store");
    }

    async fn apply_snapshot(&self, snapshot: Snapshot) {
        match snapshot.path.trim_matches('/') {
            PROJECTS_PATH => self.apply_projects(&snapshot.value).await,
            POSTS_PATH => self.apply_posts(&snapshot.value).await,
            other => tracing::debug!(path = %other, "Ignoring snapshot"),
        }
    }

    async fn apply_projects(&self, value: &Value) {
        let mut mirror = self.inner.mirror.write().await;
        let drifted = mirror.apply_projects_snapshot(value);
        if drifted.is_empty() {
            return;
        }

        let mut sessions = self.inner.sessions.write().await;
        for session in sessions.values_mut() {
            for id in &drifted {
                session.overlay.forget_project(id);
            }
        }
        tracing::debug!(count = drifted.len(), "Projects changed remotely");
    }

    async fn apply_posts(&self, value: &Value) {
        let mut mirror = self.inner.mirror.write().await;
        let removed = mirror.apply_posts_snapshot(value);
        if removed.is_empty() {
            return;
        }

        let mut sessions = self.inner.sessions.write().await;
        for session in sessions.values_mut() {
            for id in &removed {
                session.overlay.forget_post(id);
            }
        }
        tracing::debug!(count = removed.len(), "Posts removed remotely");
    }

    async fn refresh_projects(&self) -> Result<(), DomainError> {
        let value = self.inner.store.get(PROJECTS_PATH).await?;
        self.apply_projects(&value).await;
        Ok(())
    }

    async fn refresh_posts(&self) -> Result<(), DomainError> {
        let value = self.inner.store.get(POSTS_PATH).await?;
        self.apply_posts(&value).await;
        Ok(())
    }

    /// Queue a counter write without waiting. Queued writes reach the store
    /// one at a time in the order they were issued.
    fn spawn_update(&self, path: String, fields: Map<String, Value>) {
        if self
            .inner
            .counter_writes
            .send(CounterWrite { path, fields })
            .is_err()
        {
            tracing::warn!("Counter writer stopped; dropping store write");
        }
    }

    // ---- sessions ----

    /// Pass the access gate and open a session.
    pub async fn login(
        &self,
        username: &str,
        access_code: &str,
        avatar_seed: Option<&str>,
    ) -> Result<(Uuid, SessionUser), DomainError> {
        let user = self.inner.gate.admit(username, access_code, avatar_seed)?;
        let id = Uuid::new_v4();
        self.inner.sessions.write().await.insert(
            id,
            Session {
                user: user.clone(),
                overlay: SessionOverlay::new(),
            },
        );
        tracing::info!(session_id = %id, username = %user.username, role = user.role.as_str(), "Session opened");
        Ok((id, user))
    }

    pub async fn logout(&self, session_id: Uuid) -> Result<(), DomainError> {
        let session = self
            .inner
            .sessions
            .write()
            .await
            .remove(&session_id)
            .ok_or(DomainError::Unauthorized)?;
        tracing::info!(session_id = %session_id, username = %session.user.username, "Session closed");
        Ok(())
    }

    pub async fn user(&self, session_id: Uuid) -> Result<SessionUser, DomainError> {
        self.inner
            .sessions
            .read()
            .await
            .get(&session_id)
            .map(|s| s.user.clone())
            .ok_or(DomainError::Unauthorized)
    }

    // ---- assistant ----

    pub async fn explain(
        &self,
        session_id: Uuid,
        topic: &str,
        context: &str,
    ) -> Result<String, DomainError> {
        self.user(session_id).await?;
        if topic.trim().is_empty() {
            return Err(DomainError::Validation("Topic is required".to_string()));
        }
        Ok(self.inner.assistant.explain(topic, context).await)
    }
}

/// Drains the counter queue. Failures are logged and never retried.
async fn write_counters(
    store: Arc<dyn DocumentStore>,
    mut queue: mpsc::UnboundedReceiver<CounterWrite>,
) {
    while let Some(write) = queue.recv().await {
        if let Err(e) = store.update(&write.path, write.fields).await {
            tracing::warn!(path = %write.path, error = %e, "Background store write failed");
        }
    }
}

fn session_mut(
    sessions: &mut HashMap<Uuid, Session>,
    session_id: Uuid,
) -> Result<&mut Session, DomainError> {
    sessions.get_mut(&session_id).ok_or(DomainError::Unauthorized)
}

fn session_ref(sessions: &HashMap<Uuid, Session>, session_id: Uuid) -> Result<&Session, DomainError> {
    sessions.get(&session_id).ok_or(DomainError::Unauthorized)
}

fn record<T: serde::Serialize>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::Internal(e.to_string()))
}

/// Serialized form for `push`: the store key becomes the id.
fn unkeyed_record<T: serde::Serialize>(value: &T) -> Result<Value, DomainError> {
    let mut value = record(value)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}
