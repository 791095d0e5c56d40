//! Shared data models for inter-service communication
//!
//! `Profile` is the unit of identity across the portal: it is embedded in
//! session tokens, returned by the user directory over gRPC, and spliced into
//! news, likes and comments by the enrichment step.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Role every account holds. Stored explicitly alongside any other grants.
pub const DEFAULT_ROLE: &str = "reader";

/// Role required to create, edit or delete news.
pub const WRITER_ROLE: &str = "writer";

// ============================================================================
// Profile
// ============================================================================

/// Public user profile.
///
/// An unresolved reference (only `id` set) is how news, likes and comments
/// carry their users until enrichment replaces it with the directory entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "userID", default)]
    pub id: Uuid,
    #[serde(rename = "userName", default)]
    pub username: String,
    #[serde(rename = "firstName", default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(rename = "lastName", default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(rename = "surName", default, skip_serializing_if = "String::is_empty")]
    pub sur_name: String,
    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Profile {
    /// Bare reference to a user that has not been looked up yet
    pub fn reference(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// True once the directory entry has been spliced in
    pub fn is_resolved(&self) -> bool {
        !self.username.is_empty()
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Login/password pair with an optional initial profile.
///
/// Used by signup, signin and admin user creation; never persisted as-is.
#[derive(Clone, Deserialize, Validate)]
pub struct UserData {
    #[validate(length(min = 1, max = 512, message = "login must be 1..512 characters"))]
    pub login: String,
    #[validate(length(min = 1, max = 256, message = "password must not be empty"))]
    pub password: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserData")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("profile", &self.profile)
            .finish()
    }
}

// ============================================================================
// Role policy
// ============================================================================

/// Canonical role set for storage.
///
/// The default role is always stored explicitly, so every write path hands
/// its requested roles through here: names are trimmed, blanks dropped,
/// duplicates removed, and `DEFAULT_ROLE` is placed first.
pub fn normalize_roles<S: AsRef<str>>(requested: &[S]) -> Vec<String> {
    let mut roles = vec![DEFAULT_ROLE.to_string()];
    for role in requested {
        let role = role.as_ref().trim();
        if role.is_empty() || roles.iter().any(|r| r == role) {
            continue;
        }
        roles.push(role.to_string());
    }
    roles
}
