use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// A showcase post on the community board, stored under `communityPosts/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Net vote score; negative values are legal.
    #[serde(default, deserialize_with = "signed_score")]
    pub likes: i64,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub category: String,
}

impl CommunityPost {
    pub fn new(
        id: String,
        draft: PostDraft,
        author: String,
        author_avatar: String,
        timestamp: String,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            author,
            timestamp,
            image_url: draft.image_url,
            likes: 0,
            comments_count: 0,
            author_avatar: Some(author_avatar),
            category: draft.category,
        }
    }
}

/// Payload for creating or editing a community post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_post_category")]
    pub category: String,
}

fn default_post_category() -> String {
    "IoT".to_string()
}

impl PostDraft {
    /// Title and description are mandatory; nothing is written otherwise.
    pub fn validate(mut self) -> Result<Self, DomainError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and description are required".to_string(),
            ));
        }
        self.image_url = self.image_url.filter(|url| !url.trim().is_empty());
        Ok(self)
    }
}

fn signed_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value
        .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)))
        .unwrap_or(0))
}
