//! Authoritative mirror of the store's `projects` and `communityPosts`
//! subtrees.
//!
//! Each snapshot replaces a collection wholesale. Between snapshots the
//! portal patches counters in place so readers see their own writes at once;
//! when the next snapshot lands, any record that no longer matches the
//! patched copy is reported back so session overlays for it can be dropped.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::seed::sample_projects;
use crate::domain::{CommunityPost, Project};

/// Store path of the project collection.
pub const PROJECTS_PATH: &str = "projects";

/// Store path of the community board.
pub const POSTS_PATH: &str = "communityPosts";

/// Records whose identity is the store key they live under.
pub trait Keyed {
    fn key(&self) -> &str;
    fn set_key(&mut self, key: String);
}

impl Keyed for Project {
    fn key(&self) -> &str {
        &self.id
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

impl Keyed for CommunityPost {
    fn key(&self) -> &str {
        &self.id
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

/// Decode a keyed subtree into a list, taking each record's id from its key.
///
/// Records that fail to decode are skipped. A subtree the store returns as
/// an array (small integer keys) is accepted too.
pub fn decode_collection<T>(value: &Value) -> Vec<T>
where
    T: DeserializeOwned + Keyed,
{
    let entries: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .filter_map(|(key, v)| match serde_json::from_value::<T>(v.clone()) {
            Ok(mut record) => {
                record.set_key(key);
                Some(record)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping malformed record in snapshot");
                None
            }
        })
        .collect()
}

/// Ids present in `before` whose record differs in, or is missing from, `after`.
fn drifted<T: Keyed + PartialEq>(before: &[T], after: &[T]) -> Vec<String> {
    let incoming: HashMap<&str, &T> = after.iter().map(|r| (r.key(), r)).collect();
    before
        .iter()
        .filter(|old| incoming.get(old.key()).is_none_or(|new| *new != *old))
        .map(|old| old.key().to_string())
        .collect()
}

#[derive(Debug, Default)]
pub struct Mirror {
    projects: Vec<Project>,
    posts: Vec<CommunityPost>,
    sample_catalog: bool,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn posts(&self) -> &[CommunityPost] {
        &self.posts
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&CommunityPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// True while the store has no projects and the sample catalog is shown.
    pub fn is_sample_catalog(&self) -> bool {
        self.sample_catalog
    }

    /// Apply a `projects` snapshot. Returns the ids whose records drifted
    /// from what this mirror held.
    pub fn apply_projects_snapshot(&mut self, value: &Value) -> Vec<String> {
        let incoming: Vec<Project> = decode_collection(value);
        if incoming.is_empty() {
            self.sample_catalog = true;
            return self.replace_projects(sample_projects());
        }
        self.sample_catalog = false;
        self.replace_projects(incoming)
    }

    /// Apply a `communityPosts` snapshot. Returns the ids of posts that
    /// disappeared.
    pub fn apply_posts_snapshot(&mut self, value: &Value) -> Vec<String> {
        self.replace_posts(decode_collection(value))
    }

    pub fn replace_projects(&mut self, incoming: Vec<Project>) -> Vec<String> {
        let drifted = drifted(&self.projects, &incoming);
        self.projects = incoming;
        drifted
    }

    pub fn replace_posts(&mut self, incoming: Vec<CommunityPost>) -> Vec<String> {
        let removed = self
            .posts
            .iter()
            .filter(|old| !incoming.iter().any(|p| p.id == old.id))
            .map(|old| old.id.clone())
            .collect();
        self.posts = incoming;
        removed
    }

    pub fn patch_project_likes(&mut self, id: &str, likes: u64) -> bool {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.likes = likes)
            .is_some()
    }

    pub fn patch_project_views(&mut self, id: &str, views: u64) -> bool {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.views = views)
            .is_some()
    }

    pub fn patch_post_likes(&mut self, id: &str, likes: i64) -> bool {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.likes = likes)
            .is_some()
    }
}
