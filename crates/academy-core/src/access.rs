//! Login gate and privilege checks.

use std::sync::Arc;

use crate::domain::{CommunityPost, DEFAULT_AVATAR_SEED, Role, SessionUser, robot_avatar_url};
use crate::error::DomainError;
use crate::ports::PasswordService;

/// Username given to members who leave the name field blank.
pub const ANONYMOUS_MEMBER: &str = "Cadet";

/// Shared-code gate in front of the portal.
///
/// One admin account identified by username plus its own access code, and
/// a member code that admits anyone under any name.
pub struct AccessGate {
    admin_username: String,
    admin_code_hash: String,
    member_code_hash: String,
    passwords: Arc<dyn PasswordService>,
}

impl AccessGate {
    pub fn new(
        admin_username: impl Into<String>,
        admin_code_hash: impl Into<String>,
        member_code_hash: impl Into<String>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            admin_username: admin_username.into(),
            admin_code_hash: admin_code_hash.into(),
            member_code_hash: member_code_hash.into(),
            passwords,
        }
    }

    /// Admit a user or reject with [`DomainError::InvalidCredentials`].
    pub fn admit(
        &self,
        username: &str,
        code: &str,
        avatar_seed: Option<&str>,
    ) -> Result<SessionUser, DomainError> {
        let username = username.trim();
        let seed = avatar_seed
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_AVATAR_SEED);

        let role = if username == self.admin_username && self.verify(code, &self.admin_code_hash)? {
            Role::Admin
        } else if self.verify(code, &self.member_code_hash)? {
            Role::User
        } else {
            tracing::info!(username = %username, "Rejected access code");
            return Err(DomainError::InvalidCredentials);
        };

        let username = match role {
            Role::User if username.is_empty() => ANONYMOUS_MEMBER.to_string(),
            _ => username.to_string(),
        };

        Ok(SessionUser {
            username,
            role,
            avatar_seed: robot_avatar_url(seed),
        })
    }

    fn verify(&self, code: &str, hash: &str) -> Result<bool, DomainError> {
        self.passwords
            .verify(code, hash)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

pub fn can_manage_projects(user: &SessionUser) -> bool {
    user.is_admin()
}

/// Authors manage their own posts; the admin manages every post.
pub fn can_modify_post(user: &SessionUser, post: &CommunityPost) -> bool {
    user.is_admin() || post.author == user.username
}

pub fn require_project_manager(user: &SessionUser) -> Result<(), DomainError> {
    if can_manage_projects(user) {
        Ok(())
    } else {
        Err(DomainError::Forbidden("only the instructor can manage projects"))
    }
}

pub fn require_post_owner(user: &SessionUser, post: &CommunityPost) -> Result<(), DomainError> {
    if can_modify_post(user, post) {
        Ok(())
    } else {
        Err(DomainError::Forbidden("only the author can change this post"))
    }
}
