use serde::{Deserialize, Serialize};

/// Background colour passed to the avatar generator.
pub const AVATAR_BG: &str = "b6e3f4";

/// Avatar preset selected when the login form sends none.
pub const DEFAULT_AVATAR_SEED: &str = "Robot-1";

const AVATAR_PRESET_COUNT: usize = 24;

/// Session role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// The logged-in user. Lives only as long as the session; never stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
    /// Fully-formed avatar image URL.
    pub avatar_seed: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Robot avatar URL for a seed.
pub fn robot_avatar_url(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/bottts/svg?seed={seed}&backgroundColor={AVATAR_BG}")
}

/// Avatar shown when a stored avatar is missing or fails to load.
pub fn fallback_avatar(name: &str) -> String {
    robot_avatar_url(name)
}

/// The selectable avatar presets (`Robot-1` .. `Robot-24`).
pub fn avatar_presets() -> impl Iterator<Item = String> {
    (1..=AVATAR_PRESET_COUNT).map(|i| format!("Robot-{i}"))
}
