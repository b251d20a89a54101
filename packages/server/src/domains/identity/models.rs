//! Identity domain data types and the canonical role derivation.

use serde::{Deserialize, Serialize};

/// UI-facing permission class, derived from `user_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Organizer,
}

/// `user_type` values the onboarding process uses for the organizer family.
const HOST_USER_TYPES: [&str; 4] = ["host", "organiser", "organizer", "club"];

/// User profile as stored by the external profile store.
///
/// `user_type` is the source-of-truth classification written by onboarding;
/// `role` is the derived classification and must always be re-derivable from
/// `user_type` when that is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub uid: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
}

impl Profile {
    /// Minimal profile; optional fields are filled in by onboarding.
    pub fn new(uid: &str, name: &str, email: &str) -> Self {
        Self {
            uid: uid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            user_type: None,
            role: None,
            contact_details: None,
            description: None,
            github_url: None,
            linkedin_url: None,
            tech_stack: None,
            is_approved: None,
        }
    }

    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = Some(user_type.to_string());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Partial update applied through `BaseProfileStore::set`. Only the fields
/// this core writes; everything else on the profile is owned by the UI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// The single role-derivation mapping. Pure; applied identically to fresh and
/// cached profiles, so re-resolution is idempotent.
///
/// - organizer-family `user_type` -> Organizer
/// - `"user"` or any unrecognized value -> User (safe default)
/// - absent `user_type` -> previously pinned role, else User
pub fn derive_role(user_type: Option<&str>, previous: Option<UserRole>) -> UserRole {
    match user_type {
        Some(ut) => {
            let ut = ut.to_ascii_lowercase();
            if HOST_USER_TYPES.contains(&ut.as_str()) {
                UserRole::Organizer
            } else {
                UserRole::User
            }
        }
        None => previous.unwrap_or(UserRole::User),
    }
}
