//! Community board actions.

use serde_json::{Map, Value};
use uuid::Uuid;

use academy_core::access::require_post_owner;
use academy_core::domain::{BoardView, CommunityPost, PostDraft, PostView, SessionUser};
use academy_core::error::DomainError;
use academy_core::listing::{PostSort, board_stats, order_posts};
use academy_core::mirror::POSTS_PATH;
use academy_core::reconcile::{Vote, VoteDirection};

use super::{PortalService, session_mut, session_ref, unkeyed_record};

/// Score and recorded vote after a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub likes: i64,
    pub vote: Vote,
}

impl PortalService {
    pub async fn board(&self, session_id: Uuid, sort: PostSort) -> Result<BoardView, DomainError> {
        let mirror = self.inner.mirror.read().await;
        let sessions = self.inner.sessions.read().await;
        let session = session_ref(&sessions, session_id)?;

        let posts = order_posts(mirror.posts(), sort)
            .into_iter()
            .map(|p| PostView::new(p, &session.overlay))
            .collect();
        Ok(BoardView::new(sort, board_stats(mirror.posts()), posts))
    }

    /// Publish a post under the session's name and avatar.
    pub async fn create_post(
        &self,
        session_id: Uuid,
        draft: PostDraft,
    ) -> Result<CommunityPost, DomainError> {
        let user = self.user(session_id).await?;
        let draft = draft.validate()?;

        let timestamp = chrono::Utc::now().format("%-m/%-d/%Y").to_string();
        let mut post = CommunityPost::new(
            String::new(),
            draft,
            user.username,
            user.avatar_seed,
            timestamp,
        );
        let id = self
            .inner
            .store
            .push(POSTS_PATH, unkeyed_record(&post)?)
            .await?;
        post.id = id.clone();
        self.refresh_posts().await?;

        tracing::info!(post_id = %id, author = %post.author, "Community post created");
        Ok(post)
    }

    /// Patch title, description, image and category. Score and authorship
    /// are untouched.
    pub async fn edit_post(
        &self,
        session_id: Uuid,
        post_id: &str,
        draft: PostDraft,
    ) -> Result<(), DomainError> {
        let user = self.user(session_id).await?;
        self.owned_post(&user, post_id).await?;
        let draft = draft.validate()?;

        let mut fields = Map::new();
        fields.insert("title".into(), Value::String(draft.title));
        fields.insert("description".into(), Value::String(draft.description));
        fields.insert(
            "imageUrl".into(),
            draft.image_url.map(Value::String).unwrap_or(Value::Null),
        );
        fields.insert("category".into(), Value::String(draft.category));
        self.inner
            .store
            .update(&format!("{POSTS_PATH}/{post_id}"), fields)
            .await?;
        self.refresh_posts().await?;

        tracing::info!(post_id = %post_id, "Community post updated");
        Ok(())
    }

    pub async fn delete_post(&self, session_id: Uuid, post_id: &str) -> Result<(), DomainError> {
        let user = self.user(session_id).await?;
        self.owned_post(&user, post_id).await?;

        self.inner
            .store
            .remove(&format!("{POSTS_PATH}/{post_id}"))
            .await?;
        self.refresh_posts().await?;

        tracing::info!(post_id = %post_id, "Community post deleted");
        Ok(())
    }

    /// Up- or down-vote a post. Repeating the recorded vote changes nothing.
    pub async fn vote(
        &self,
        session_id: Uuid,
        post_id: &str,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, DomainError> {
        let mut mirror = self.inner.mirror.write().await;
        let mut sessions = self.inner.sessions.write().await;
        let session = session_mut(&mut sessions, session_id)?;

        let current = mirror
            .post(post_id)
            .ok_or_else(|| DomainError::post_not_found(post_id))?
            .likes;

        let Some(delta) = session.overlay.apply_vote(post_id, direction) else {
            return Ok(VoteOutcome {
                likes: current,
                vote: session.overlay.vote(post_id),
            });
        };

        let likes = current + delta;
        mirror.patch_post_likes(post_id, likes);

        let mut fields = Map::new();
        fields.insert("likes".into(), Value::from(likes));
        self.spawn_update(format!("{POSTS_PATH}/{post_id}"), fields);

        tracing::debug!(post_id = %post_id, delta, likes, "Vote recorded");
        Ok(VoteOutcome {
            likes,
            vote: session.overlay.vote(post_id),
        })
    }

    async fn owned_post(&self, user: &SessionUser, post_id: &str) -> Result<(), DomainError> {
        let mirror = self.inner.mirror.read().await;
        let post = mirror
            .post(post_id)
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        require_post_owner(user, post)
    }
}
