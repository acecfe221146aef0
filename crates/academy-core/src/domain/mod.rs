//! Domain entities - the portal's business objects.

mod community;
mod project;
pub mod seed;
mod user;
mod view;

pub use community::{CommunityPost, PostDraft};
pub use project::{
    COMMENT_AVATAR_COLOR, Category, Comment, DEFAULT_AUTHOR, DEFAULT_THUMBNAIL, Difficulty,
    Hardware, LessonStep, Media, MediaKind, Project, ProjectDraft, Software,
};
pub use user::{
    AVATAR_BG, DEFAULT_AVATAR_SEED, Role, SessionUser, avatar_presets, fallback_avatar,
    robot_avatar_url,
};
pub use view::{
    BoardView, CommentView, OutlineEntry, PostView, ProjectCard, ProjectDetail, step_anchor,
};
