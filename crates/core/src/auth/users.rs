//! Admin user management (superadmin only).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Password the backend assigns to newly created users.
pub const DEFAULT_PASSWORD: &str = "12345";

/// Create-user form; also the body of `POST /admin/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdminUser {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

/// Create-user form is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Full name and email are required")]
pub struct IncompleteUser;

impl NewAdminUser {
    /// Trimmed copy, rejecting blanks.
    pub fn validated(&self) -> Result<Self, IncompleteUser> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();
        if full_name.is_empty() || email.is_empty() {
            return Err(IncompleteUser);
        }
        Ok(Self {
            full_name: full_name.to_string(),
            email: email.to_string(),
        })
    }

    /// Notice shown after creation.
    #[must_use]
    pub fn created_notice() -> String {
        format!("User created successfully. Default password: {DEFAULT_PASSWORD}")
    }
}

/// Body of `PUT /admin/users/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUpdate {
    pub is_active: bool,
}

/// Body of `PUT /admin/users/:id/password`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub new_password: String,
}

/// Body of `POST /auth/change-password`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub user_id: crate::types::AdminUserId,
    pub current_password: String,
    pub new_password: String,
}
