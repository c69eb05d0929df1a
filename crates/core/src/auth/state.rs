//! Explicit authentication state machine.
//!
//! `Anonymous -> Authenticating -> Authenticated | PasswordChangeRequired`,
//! `PasswordChangeRequired -> Authenticated` after a successful change, and
//! any state back to `Anonymous` on logout.

use thiserror::Error;

use super::{AdminUser, LoginOutcome};
use crate::types::AdminUserId;

/// Where an admin is in the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No credentials.
    #[default]
    Anonymous,
    /// Login request in flight.
    Authenticating,
    /// Logged in with a token.
    Authenticated(AdminUser),
    /// Credentials accepted; password rotation pending, no token yet.
    PasswordChangeRequired(AdminUserId),
}

/// A transition that is not valid from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} while {state}")]
pub struct AuthTransitionError {
    action: &'static str,
    state: &'static str,
}

impl AuthState {
    const fn name(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated(_) => "authenticated",
            Self::PasswordChangeRequired(_) => "awaiting a password change",
        }
    }

    fn reject(&self, action: &'static str) -> AuthTransitionError {
        AuthTransitionError {
            action,
            state: self.name(),
        }
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&AdminUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a token has been issued.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Start a login attempt. A new login replaces any previous session.
    pub fn begin_login(&mut self) -> Result<(), AuthTransitionError> {
        if matches!(self, Self::Authenticating) {
            return Err(self.reject("log in"));
        }
        *self = Self::Authenticating;
        Ok(())
    }

    /// Apply a successful login response.
    pub fn login_succeeded(&mut self, outcome: LoginOutcome) -> Result<(), AuthTransitionError> {
        if !matches!(self, Self::Authenticating) {
            return Err(self.reject("complete a login"));
        }
        *self = match outcome {
            LoginOutcome::Authenticated { user, .. } => Self::Authenticated(user),
            LoginOutcome::PasswordChangeRequired { user_id } => {
                Self::PasswordChangeRequired(user_id)
            }
        };
        Ok(())
    }

    /// A failed login ends anonymous.
    pub fn login_failed(&mut self) {
        if matches!(self, Self::Authenticating) {
            *self = Self::Anonymous;
        }
    }

    /// Complete the forced password change.
    pub fn password_changed(&mut self, user: AdminUser) -> Result<(), AuthTransitionError> {
        match self {
            Self::PasswordChangeRequired(id) if *id == user.id => {
                *self = Self::Authenticated(user);
                Ok(())
            }
            _ => Err(self.reject("complete a password change")),
        }
    }

    /// Log out from any state.
    pub fn logout(&mut self) {
        *self = Self::Anonymous;
    }
}
