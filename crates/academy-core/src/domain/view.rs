//! Display shapes: stored records with the session overlay applied.

use serde::Serialize;

use super::community::CommunityPost;
use super::project::{Category, Comment, Difficulty, Hardware, LessonStep, Project, Software};
use super::user::fallback_avatar;
use crate::listing::{BoardStats, PostSort};
use crate::reconcile::{SessionOverlay, vote_label};

/// Catalog card for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_avatar: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub thumbnail: String,
    pub views: u64,
    pub likes: u64,
    pub duration: String,
    pub published_at: String,
    pub comment_count: usize,
    pub is_liked_by_user: bool,
}

impl ProjectCard {
    pub fn new(project: &Project, overlay: &SessionOverlay) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            author: project.author.clone(),
            author_avatar: fallback_avatar(&project.author),
            difficulty: project.difficulty,
            category: project.category,
            thumbnail: project.thumbnail.clone(),
            views: project.views,
            likes: project.likes,
            duration: project.duration.clone(),
            published_at: project.published_at.clone(),
            comment_count: project.comments.len(),
            is_liked_by_user: overlay.is_project_liked(&project.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub author: String,
    pub author_avatar: String,
    pub text: String,
    pub timestamp: String,
    pub avatar_color: String,
    pub likes: u64,
    pub is_liked_by_user: bool,
}

impl CommentView {
    pub fn new(project_id: &str, comment: &Comment, overlay: &SessionOverlay) -> Self {
        let liked = overlay.is_comment_liked(project_id, &comment.id);
        Self {
            id: comment.id.clone(),
            author: comment.author.clone(),
            author_avatar: fallback_avatar(&comment.author),
            text: comment.text.clone(),
            timestamp: comment.timestamp.clone(),
            avatar_color: comment.avatar_color.clone(),
            likes: comment.likes + u64::from(liked),
            is_liked_by_user: liked,
        }
    }
}

/// Entry of the detail page's section navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    fn leaf(id: &str, label: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// Anchor slug for a lesson step: whitespace runs become `-`, lowercased.
pub fn step_anchor(title: &str) -> String {
    let mut slug = String::from("step-");
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// Full build guide for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub card: ProjectCard,
    pub hardware: Vec<Hardware>,
    pub software: Vec<Software>,
    pub steps: Vec<LessonStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub makecode_url: Option<String>,
    pub comments: Vec<CommentView>,
    pub outline: Vec<OutlineEntry>,
}

impl ProjectDetail {
    pub fn new(project: &Project, overlay: &SessionOverlay) -> Self {
        let comments: Vec<CommentView> = project
            .comments
            .iter()
            .map(|c| CommentView::new(&project.id, c, overlay))
            .collect();

        let story = OutlineEntry {
            id: "story".to_string(),
            label: "Story".to_string(),
            children: project
                .steps
                .iter()
                .map(|s| OutlineEntry::leaf(&step_anchor(&s.title), s.title.clone()))
                .collect(),
        };
        let outline = vec![
            OutlineEntry::leaf("overview", "Overview"),
            OutlineEntry::leaf("hardware", "Hardware"),
            story,
            OutlineEntry::leaf("schematics", "Schematics"),
            OutlineEntry::leaf("code", "Code"),
            OutlineEntry::leaf("credits", "Credits"),
            OutlineEntry::leaf("comments", format!("Comments ({})", comments.len())),
        ];

        Self {
            card: ProjectCard::new(project, overlay),
            hardware: project.hardware.clone(),
            software: project.software.clone(),
            steps: project.steps.clone(),
            makecode_url: project.makecode_url.clone(),
            comments,
            outline,
        }
    }
}

/// A community post as one session sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: CommunityPost,
    pub current_vote: i64,
    pub vote_label: String,
    pub avatar_url: String,
    pub fallback_avatar: String,
}

impl PostView {
    pub fn new(post: &CommunityPost, overlay: &SessionOverlay) -> Self {
        let fallback = fallback_avatar(&post.author);
        Self {
            current_vote: overlay.vote(&post.id).value(),
            vote_label: vote_label(post.likes),
            avatar_url: post
                .author_avatar
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| fallback.clone()),
            fallback_avatar: fallback,
            post: post.clone(),
        }
    }
}

/// The community board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub sort: &'static str,
    pub stats: BoardStats,
    pub posts: Vec<PostView>,
}

impl BoardView {
    pub fn new(sort: PostSort, stats: BoardStats, posts: Vec<PostView>) -> Self {
        Self {
            sort: sort.label(),
            stats,
            posts,
        }
    }
}
