//! Admin authentication domain.
//!
//! The backend owns credentials; this module models what the site learns
//! from it (users, login outcomes) and the rules the site enforces locally
//! before anything reaches the network (password policy, idle timeout,
//! reaction to a 401).

mod idle;
mod password;
mod state;
mod users;

pub use idle::{IDLE_NOTICE, IDLE_POLL_INTERVAL_SECS, IDLE_TIMEOUT_SECS, IdlePoll, IdleTracker};
pub use password::{MIN_LENGTH, PasswordError, PasswordPolicy, SYMBOLS};
pub use state::{AuthState, AuthTransitionError};
pub use users::{
    ActiveUpdate, DEFAULT_PASSWORD, IncompleteUser, NewAdminUser, PasswordChange, PasswordReset,
};

use serde::{Deserialize, Serialize};

use crate::types::{AdminUserId, Role};

/// Path of the admin login page.
pub const LOGIN_PATH: &str = "/admin/login";

/// Prefix of every admin page.
pub const ADMIN_PREFIX: &str = "/admin";

/// An admin user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Backend user ID.
    pub id: AdminUserId,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Permission level.
    #[serde(default)]
    pub role: Role,
    /// Set while the account still uses its default or an expired password.
    #[serde(default)]
    pub must_change_password: bool,
    /// Deactivated accounts cannot log in.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl AdminUser {
    /// Name to greet the user with, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Result of a successful call to the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted and a bearer token issued.
    Authenticated {
        /// Opaque bearer token.
        token: String,
        /// The logged-in user.
        user: AdminUser,
    },
    /// Credentials accepted but the password must be rotated first.
    PasswordChangeRequired {
        /// User that has to change their password.
        user_id: AdminUserId,
    },
}

impl LoginOutcome {
    /// The issued token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            Self::PasswordChangeRequired { .. } => None,
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Raw login response: either `{token, user}` or `{mustChangePassword, userId}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AdminUser>,
    #[serde(default)]
    pub must_change_password: bool,
    #[serde(default)]
    pub user_id: Option<AdminUserId>,
}

impl LoginResponse {
    /// Interpret the response.
    ///
    /// Returns `None` when the body carries neither a token nor a
    /// password-change demand.
    #[must_use]
    pub fn into_outcome(self) -> Option<LoginOutcome> {
        if self.must_change_password {
            let user_id = self.user_id.or_else(|| self.user.as_ref().map(|u| u.id))?;
            return Some(LoginOutcome::PasswordChangeRequired { user_id });
        }
        match (self.token, self.user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                Some(LoginOutcome::Authenticated { token, user })
            }
            _ => None,
        }
    }
}

/// What to do with stored credentials after the backend answered 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedAction {
    /// Wipe credentials and send the browser to the login page.
    ClearAndRedirect,
    /// Wipe credentials and leave the current page alone.
    ClearOnly,
}

/// Decide how a 401 is handled for the page at `path`.
///
/// Only admin pages other than the login page redirect; everywhere else the
/// stale token is dropped silently so public pages never loop.
#[must_use]
pub fn unauthorized_action(path: &str) -> UnauthorizedAction {
    let under_admin = path == ADMIN_PREFIX || path.starts_with("/admin/");
    if under_admin && path != LOGIN_PATH {
        UnauthorizedAction::ClearAndRedirect
    } else {
        UnauthorizedAction::ClearOnly
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": 3,
            "fullName": "Tendai Moyo",
            "email": "tendai@reshow.co.zw",
            "role": "superadmin",
            "mustChangePassword": false
        })
    }

    #[test]
    fn test_admin_user_wire_names() {
        let user: AdminUser = serde_json::from_value(user_json()).unwrap();
        assert_eq!(user.id, AdminUserId::new(3));
        assert_eq!(user.role, Role::SuperAdmin);
        assert!(user.is_active);
        assert_eq!(user.display_name(), "Tendai Moyo");
    }

    #[test]
    fn test_login_response_authenticated() {
        let resp: LoginResponse =
            serde_json::from_value(serde_json::json!({"token": "abc", "user": user_json()}))
                .unwrap();
        let outcome = resp.into_outcome();
        assert_eq!(outcome.as_ref().and_then(LoginOutcome::token), Some("abc"));
        match outcome {
            Some(LoginOutcome::Authenticated { token, user }) => {
                assert_eq!(token, "abc");
                assert_eq!(user.email, "tendai@reshow.co.zw");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_login_response_must_change() {
        let resp: LoginResponse =
            serde_json::from_value(serde_json::json!({"mustChangePassword": true, "userId": 9}))
                .unwrap();
        let outcome = resp.into_outcome();
        assert_eq!(outcome.as_ref().and_then(LoginOutcome::token), None);
        assert_eq!(
            outcome,
            Some(LoginOutcome::PasswordChangeRequired {
                user_id: AdminUserId::new(9)
            })
        );
    }

    #[test]
    fn test_login_response_empty_is_none() {
        let resp: LoginResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(resp.into_outcome(), None);
    }

    #[test]
    fn test_unauthorized_on_admin_page_redirects() {
        assert_eq!(
            unauthorized_action("/admin/products"),
            UnauthorizedAction::ClearAndRedirect
        );
        assert_eq!(unauthorized_action("/admin"), UnauthorizedAction::ClearAndRedirect);
    }

    #[test]
    fn test_unauthorized_on_login_or_public_page_only_clears() {
        assert_eq!(unauthorized_action("/admin/login"), UnauthorizedAction::ClearOnly);
        assert_eq!(unauthorized_action("/about"), UnauthorizedAction::ClearOnly);
        assert_eq!(unauthorized_action("/administrator"), UnauthorizedAction::ClearOnly);
    }
}
