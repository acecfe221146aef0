//! Optimistic interaction bookkeeping.
//!
//! Two independent protocols run between the instantaneous local toggle and
//! the eventual store write: the binary project like and the tri-state
//! community vote. Neither waits for the store; both leave the store's
//! counters consistent with what the session has done so far.

use std::collections::{HashMap, HashSet};

use crate::error::DomainError;

/// Result of toggling a project like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Counter value to write to the store.
    pub likes: u64,
    /// Local flag after the toggle.
    pub liked: bool,
}

/// Toggle a project like. Unliking never takes the counter below zero.
pub fn toggle_like(likes: u64, liked: bool) -> LikeOutcome {
    if liked {
        LikeOutcome {
            likes: likes.saturating_sub(1),
            liked: false,
        }
    } else {
        LikeOutcome {
            likes: likes + 1,
            liked: true,
        }
    }
}

/// A session's recorded vote on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vote {
    #[default]
    Neutral,
    Up,
    Down,
}

impl Vote {
    pub fn value(self) -> i64 {
        match self {
            Vote::Neutral => 0,
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

/// Direction requested by a vote action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn sign(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

impl From<VoteDirection> for Vote {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => Vote::Up,
            VoteDirection::Down => Vote::Down,
        }
    }
}

impl TryFrom<i64> for VoteDirection {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteDirection::Up),
            -1 => Ok(VoteDirection::Down),
            other => Err(DomainError::Validation(format!(
                "Vote direction must be 1 or -1, got {other}"
            ))),
        }
    }
}

/// Delta to apply to a post's stored score when moving from `current` to
/// `requested`. `None` means the request repeats the recorded vote.
pub fn vote_delta(current: Vote, requested: VoteDirection) -> Option<i64> {
    let target = Vote::from(requested);
    if current == target {
        return None;
    }
    match current {
        Vote::Neutral => Some(requested.sign()),
        // Reversal cancels the old vote and applies the new one in one write.
        Vote::Up | Vote::Down => Some(2 * requested.sign()),
    }
}

/// Display label for a post score.
pub fn vote_label(likes: i64) -> String {
    if likes == 0 {
        "Vote".to_string()
    } else {
        likes.to_string()
    }
}

/// Transient per-session state layered over the authoritative mirror.
///
/// Keyed by entity id. Nothing here is ever written to the store as such;
/// only its effect on counters is.
#[derive(Debug, Clone, Default)]
pub struct SessionOverlay {
    liked_projects: HashSet<String>,
    votes: HashMap<String, Vote>,
    liked_comments: HashMap<String, HashSet<String>>,
}

impl SessionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_project_liked(&self, project_id: &str) -> bool {
        self.liked_projects.contains(project_id)
    }

    pub fn set_project_liked(&mut self, project_id: &str, liked: bool) {
        if liked {
            self.liked_projects.insert(project_id.to_string());
        } else {
            self.liked_projects.remove(project_id);
        }
    }

    pub fn vote(&self, post_id: &str) -> Vote {
        self.votes.get(post_id).copied().unwrap_or_default()
    }

    /// Record a vote request and return the delta to send, if any.
    pub fn apply_vote(&mut self, post_id: &str, requested: VoteDirection) -> Option<i64> {
        let delta = vote_delta(self.vote(post_id), requested)?;
        self.votes.insert(post_id.to_string(), requested.into());
        Some(delta)
    }

    pub fn is_comment_liked(&self, project_id: &str, comment_id: &str) -> bool {
        self.liked_comments
            .get(project_id)
            .is_some_and(|ids| ids.contains(comment_id))
    }

    /// Flip the session's like on a comment, returning the new state.
    pub fn toggle_comment_like(&mut self, project_id: &str, comment_id: &str) -> bool {
        let liked = self.liked_comments.entry(project_id.to_string()).or_default();
        if liked.remove(comment_id) {
            false
        } else {
            liked.insert(comment_id.to_string());
            true
        }
    }

    /// Drop optimistic flags for a project whose stored record moved on.
    pub fn forget_project(&mut self, project_id: &str) {
        self.liked_projects.remove(project_id);
        self.liked_comments.remove(project_id);
    }

    /// Drop the vote ledger entry for a post that no longer exists.
    pub fn forget_post(&mut self, post_id: &str) {
        self.votes.remove(post_id);
    }
}
