use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Thumbnail used when the editor submits none.
pub const DEFAULT_THUMBNAIL: &str =
    "https://images.unsplash.com/photo-1518770660439-4636190af475?auto=format&fit=crop&q=80&w=800";

/// Author recorded on projects created through the editor.
pub const DEFAULT_AUTHOR: &str = "STEM Academy Admin";

const UNTITLED: &str = "Untitled Project";

/// Project difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| DomainError::Validation(format!("Unknown difficulty: {s}")))
    }
}

/// Project category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "IoT")]
    Iot,
    Robotics,
    #[serde(rename = "AI")]
    Ai,
    Electronics,
    #[serde(rename = "3D Printing")]
    Printing3d,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Iot,
        Self::Robotics,
        Self::Ai,
        Self::Electronics,
        Self::Printing3d,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Iot => "IoT",
            Self::Robotics => "Robotics",
            Self::Ai => "AI",
            Self::Electronics => "Electronics",
            Self::Printing3d => "3D Printing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| DomainError::Validation(format!("Unknown category: {s}")))
    }
}

/// Kind of media attached to a lesson step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// One step of a build guide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Single image from older records; newer ones use `media`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makecode_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hardware {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Software {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A comment on a project. Likes are only ever changed locally per session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub avatar_color: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
}

/// Avatar colour tag given to comments written through the portal.
pub const COMMENT_AVATAR_COLOR: &str = "bg-blue-900";

impl Comment {
    pub fn new(id: String, author: String, text: String) -> Self {
        Self {
            id,
            author,
            text,
            timestamp: "Just now".to_string(),
            avatar_color: COMMENT_AVATAR_COLOR.to_string(),
            likes: 0,
        }
    }
}

/// Project entity as stored under `projects/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub views: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    #[serde(default)]
    pub duration: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub hardware: Vec<Hardware>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub software: Vec<Software>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub steps: Vec<LessonStep>,
    #[serde(
        default,
        serialize_with = "comments_as_map",
        deserialize_with = "comments_from_store"
    )]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makecode_url: Option<String>,
}

impl Project {
    /// Build a brand new project from an editor draft.
    pub fn from_draft(id: String, draft: ProjectDraft, published_at: String) -> Self {
        let draft = draft.normalized();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            author: DEFAULT_AUTHOR.to_string(),
            difficulty: draft.difficulty,
            category: draft.category,
            thumbnail: draft.thumbnail,
            views: 0,
            likes: 0,
            duration: draft.duration,
            hardware: draft.hardware,
            software: Vec::new(),
            steps: draft.steps,
            comments: Vec::new(),
            published_at,
            makecode_url: draft.makecode_url,
        }
    }

    /// Apply an editor draft to an existing project.
    ///
    /// Identity, counters, authorship, publication date and the comment
    /// thread are carried over from `self`.
    pub fn revised(&self, draft: ProjectDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id: self.id.clone(),
            title: draft.title,
            description: draft.description,
            author: self.author.clone(),
            difficulty: draft.difficulty,
            category: draft.category,
            thumbnail: draft.thumbnail,
            views: self.views,
            likes: self.likes,
            duration: draft.duration,
            hardware: draft.hardware,
            software: self.software.clone(),
            steps: draft.steps,
            comments: self.comments.clone(),
            published_at: self.published_at.clone(),
            makecode_url: draft.makecode_url,
        }
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

/// Editor payload for creating or revising a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub hardware: Vec<Hardware>,
    #[serde(default)]
    pub steps: Vec<LessonStep>,
    #[serde(default)]
    pub makecode_url: Option<String>,
}

impl ProjectDraft {
    fn normalized(mut self) -> Self {
        if self.title.trim().is_empty() {
            self.title = UNTITLED.to_string();
        }
        if self.thumbnail.trim().is_empty() {
            self.thumbnail = DEFAULT_THUMBNAIL.to_string();
        }
        if self.duration.trim().is_empty() {
            self.duration = "1 Hour".to_string();
        }
        self.makecode_url = self.makecode_url.filter(|url| !url.trim().is_empty());
        self
    }
}

/// Counters arrive from the store as arbitrary JSON numbers (or null).
/// Anything negative or missing reads as zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value
        .and_then(|n| {
            n.as_u64()
                .or_else(|| n.as_i64().map(|_| 0))
                .or_else(|| n.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 }))
        })
        .unwrap_or(0))
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredComments {
    Keyed(BTreeMap<String, Comment>),
    Listed(Vec<Option<Comment>>),
}

fn comments_from_store<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredComments>::deserialize(deserializer)?;
    Ok(match stored {
        None => Vec::new(),
        Some(StoredComments::Keyed(map)) => map
            .into_iter()
            .map(|(key, mut comment)| {
                if comment.id.is_empty() {
                    comment.id = key;
                }
                comment
            })
            .collect(),
        // Array positions are the store keys of an array-shaped subtree.
        Some(StoredComments::Listed(list)) => list
            .into_iter()
            .enumerate()
            .filter_map(|(index, comment)| {
                comment.map(|mut comment| {
                    if comment.id.is_empty() {
                        comment.id = index.to_string();
                    }
                    comment
                })
            })
            .collect(),
    })
}

fn comments_as_map<S>(comments: &[Comment], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(comments.len()))?;
    for comment in comments {
        map.serialize_entry(&comment.id, comment)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let project: Project = serde_json::from_value(json!({
            "title": "Bare",
            "category": "Robotics",
        }))
        .unwrap();

        assert_eq!(project.views, 0);
        assert_eq!(project.likes, 0);
        assert!(project.comments.is_empty());
        assert!(project.hardware.is_empty());
        assert!(project.steps.is_empty());
        assert_eq!(project.category, Category::Robotics);
        assert_eq!(project.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_null_sequences_and_negative_counters() {
        let project: Project = serde_json::from_value(json!({
            "title": "Odd",
            "likes": -4,
            "views": 12.0,
            "hardware": null,
            "steps": [null, {"title": "Only step", "content": "..."}],
            "comments": null,
        }))
        .unwrap();

        assert_eq!(project.likes, 0);
        assert_eq!(project.views, 12);
        assert!(project.hardware.is_empty());
        assert_eq!(project.steps.len(), 1);
        assert!(project.comments.is_empty());
    }

    #[test]
    fn test_keyed_comments_take_id_from_key() {
        let project: Project = serde_json::from_value(json!({
            "comments": {
                "k1": {"author": "Ana", "text": "Nice", "likes": 2},
                "k2": {"id": "k2", "author": "Ben", "text": "Cool"}
            }
        }))
        .unwrap();

        let ids: Vec<_> = project.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["k1", "k2"]);
        assert_eq!(project.comments[0].likes, 2);
    }

    #[test]
    fn test_listed_comments_take_id_from_position() {
        let project: Project = serde_json::from_value(json!({
            "comments": [
                {"author": "A", "text": "one"},
                null,
                {"author": "B", "text": "two"},
                {"id": "kept", "author": "C", "text": "three"}
            ]
        }))
        .unwrap();

        let ids: Vec<_> = project.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "2", "kept"]);

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["comments"].as_object().unwrap().len(), 3);
        assert_eq!(value["comments"]["2"]["text"], "two");
    }

    #[test]
    fn test_comments_are_written_keyed_by_id() {
        let mut project = Project::default();
        project.comments.push(Comment::new("c9".into(), "Ana".into(), "Hi".into()));

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["comments"]["c9"]["text"], "Hi");
        assert_eq!(value["comments"]["c9"]["avatarColor"], COMMENT_AVATAR_COLOR);
    }

    #[test]
    fn test_category_labels_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
        assert!("Gardening".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_value(Category::Printing3d).unwrap(),
            json!("3D Printing")
        );
    }

    #[test]
    fn test_draft_defaults_are_applied() {
        let project = Project::from_draft(
            "p1".into(),
            ProjectDraft {
                makecode_url: Some("  ".into()),
                ..Default::default()
            },
            "2024-01-01".into(),
        );

        assert_eq!(project.title, "Untitled Project");
        assert_eq!(project.thumbnail, DEFAULT_THUMBNAIL);
        assert_eq!(project.duration, "1 Hour");
        assert_eq!(project.author, DEFAULT_AUTHOR);
        assert_eq!(project.makecode_url, None);
    }

    #[test]
    fn test_revision_keeps_counters_and_thread() {
        let mut original = Project::from_draft("p1".into(), ProjectDraft::default(), "2023-10-15".into());
        original.views = 40;
        original.likes = 7;
        original.comments.push(Comment::new("c1".into(), "Ana".into(), "Hi".into()));

        let revised = original.revised(ProjectDraft {
            title: "Renamed".into(),
            category: Category::Ai,
            ..Default::default()
        });

        assert_eq!(revised.id, "p1");
        assert_eq!(revised.title, "Renamed");
        assert_eq!(revised.category, Category::Ai);
        assert_eq!(revised.views, 40);
        assert_eq!(revised.likes, 7);
        assert_eq!(revised.comments.len(), 1);
        assert_eq!(revised.published_at, "2023-10-15");
    }
}
