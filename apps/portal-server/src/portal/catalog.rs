//! Project catalog actions.

use serde_json::{Map, Value};
use uuid::Uuid;

use academy_core::access::require_project_manager;
use academy_core::domain::{Comment, CommentView, Project, ProjectCard, ProjectDetail, ProjectDraft};
use academy_core::error::DomainError;
use academy_core::listing::{ListQuery, derive};
use academy_core::mirror::{Mirror, PROJECTS_PATH};
use academy_core::reconcile::{LikeOutcome, toggle_like};

use super::{PortalService, record, session_mut, session_ref, unkeyed_record};

fn counter(name: &str, value: impl Into<Value>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(name.to_string(), value.into());
    fields
}

/// A stored project. Sample projects are read-only.
fn editable<'a>(mirror: &'a Mirror, project_id: &str) -> Result<&'a Project, DomainError> {
    let project = mirror
        .project(project_id)
        .ok_or_else(|| DomainError::project_not_found(project_id))?;
    if mirror.is_sample_catalog() {
        return Err(DomainError::Validation(
            "Sample projects cannot be changed".to_string(),
        ));
    }
    Ok(project)
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

impl PortalService {
    /// The catalog as this session sees it.
    pub async fn list(
        &self,
        session_id: Uuid,
        query: &ListQuery,
    ) -> Result<Vec<ProjectCard>, DomainError> {
        let mirror = self.inner.mirror.read().await;
        let sessions = self.inner.sessions.read().await;
        let session = session_ref(&sessions, session_id)?;

        Ok(derive(mirror.projects(), query)
            .into_iter()
            .map(|p| ProjectCard::new(p, &session.overlay))
            .collect())
    }

    /// Open a project's detail page. Counts one view.
    pub async fn open(&self, session_id: Uuid, project_id: &str) -> Result<ProjectDetail, DomainError> {
        let mut mirror = self.inner.mirror.write().await;
        let sessions = self.inner.sessions.read().await;
        let session = session_ref(&sessions, session_id)?;

        let views = mirror
            .project(project_id)
            .ok_or_else(|| DomainError::project_not_found(project_id))?
            .views
            + 1;
        mirror.patch_project_views(project_id, views);

        let project = mirror
            .project(project_id)
            .ok_or_else(|| DomainError::project_not_found(project_id))?;
        let detail = ProjectDetail::new(project, &session.overlay);

        if !mirror.is_sample_catalog() {
            self.spawn_update(format!("{PROJECTS_PATH}/{project_id}"), counter("views", views));
        }
        Ok(detail)
    }

    /// Flip this session's like on a project.
    pub async fn toggle_like(
        &self,
        session_id: Uuid,
        project_id: &str,
    ) -> Result<LikeOutcome, DomainError> {
        let mut mirror = self.inner.mirror.write().await;
        let mut sessions = self.inner.sessions.write().await;
        let session = session_mut(&mut sessions, session_id)?;

        let likes = mirror
            .project(project_id)
            .ok_or_else(|| DomainError::project_not_found(project_id))?
            .likes;
        let outcome = toggle_like(likes, session.overlay.is_project_liked(project_id));
        session.overlay.set_project_liked(project_id, outcome.liked);
        mirror.patch_project_likes(project_id, outcome.likes);

        if !mirror.is_sample_catalog() {
            self.spawn_update(
                format!("{PROJECTS_PATH}/{project_id}"),
                counter("likes", outcome.likes),
            );
        }
        tracing::debug!(project_id = %project_id, likes = outcome.likes, liked = outcome.liked, "Project like toggled");
        Ok(outcome)
    }

    pub async fn create_project(
        &self,
        session_id: Uuid,
        draft: ProjectDraft,
    ) -> Result<Project, DomainError> {
        require_project_manager(&self.user(session_id).await?)?;

        let mut project = Project::from_draft(String::new(), draft, today());
        let id = self
            .inner
            .store
            .push(PROJECTS_PATH, unkeyed_record(&project)?)
            .await?;
        project.id = id.clone();
        self.refresh_projects().await?;

        tracing::info!(project_id = %id, title = %project.title, "Project created");
        Ok(project)
    }

    /// Replace a project's editable content. Counters, author, publication
    /// date and comments are kept.
    pub async fn edit_project(
        &self,
        session_id: Uuid,
        project_id: &str,
        draft: ProjectDraft,
    ) -> Result<Project, DomainError> {
        require_project_manager(&self.user(session_id).await?)?;

        let revised = {
            let mirror = self.inner.mirror.read().await;
            editable(&mirror, project_id)?.revised(draft)
        };
        self.inner
            .store
            .set(&format!("{PROJECTS_PATH}/{project_id}"), record(&revised)?)
            .await?;
        self.refresh_projects().await?;

        tracing::info!(project_id = %project_id, "Project updated");
        Ok(revised)
    }

    pub async fn delete_project(&self, session_id: Uuid, project_id: &str) -> Result<(), DomainError> {
        require_project_manager(&self.user(session_id).await?)?;

        editable(&*self.inner.mirror.read().await, project_id)?;
        self.inner
            .store
            .remove(&format!("{PROJECTS_PATH}/{project_id}"))
            .await?;
        self.refresh_projects().await?;

        tracing::info!(project_id = %project_id, "Project deleted");
        Ok(())
    }

    /// Append a comment signed with the session's username.
    pub async fn add_comment(
        &self,
        session_id: Uuid,
        project_id: &str,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let user = self.user(session_id).await?;
        if text.trim().is_empty() {
            return Err(DomainError::Validation("Comment text is required".to_string()));
        }
        {
            let mirror = self.inner.mirror.read().await;
            editable(&mirror, project_id)?;
        }

        let mut comment = Comment::new(String::new(), user.username, text.to_string());
        let key = self
            .inner
            .store
            .push(
                &format!("{PROJECTS_PATH}/{project_id}/comments"),
                unkeyed_record(&comment)?,
            )
            .await?;
        comment.id = key.clone();
        self.refresh_projects().await?;

        tracing::info!(project_id = %project_id, comment_id = %key, "Comment added");
        Ok(comment)
    }

    /// Flip this session's like on a comment. Never written to the store.
    pub async fn toggle_comment_like(
        &self,
        session_id: Uuid,
        project_id: &str,
        comment_id: &str,
    ) -> Result<CommentView, DomainError> {
        let mirror = self.inner.mirror.read().await;
        let mut sessions = self.inner.sessions.write().await;
        let session = session_mut(&mut sessions, session_id)?;

        let comment = mirror
            .project(project_id)
            .ok_or_else(|| DomainError::project_not_found(project_id))?
            .comment(comment_id)
            .ok_or_else(|| DomainError::comment_not_found(comment_id))?;
        session.overlay.toggle_comment_like(project_id, comment_id);

        Ok(CommentView::new(project_id, comment, &session.overlay))
    }
}
