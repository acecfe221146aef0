//! Data Transfer Objects - request/response bodies of the portal API.

use serde::{Deserialize, Serialize};

/// Login form: a display name, the access code and an avatar preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    pub access_code: String,
    #[serde(default)]
    pub avatar_seed: Option<String>,
}

/// The logged-in user as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub username: String,
    pub role: String,
    pub avatar_url: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: SessionResponse,
}

/// Catalog query. Every selector is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardParams {
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// `direction` is `1` for up and `-1` for down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub direction: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: u64,
    pub is_liked_by_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub likes: i64,
    pub current_vote: i64,
    pub vote_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub topic: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_defaults() {
        let req: LoginRequest = serde_json::from_value(json!({"accessCode": "STEM2024"})).unwrap();
        assert_eq!(req.username, "");
        assert!(req.avatar_seed.is_none());
    }
}
