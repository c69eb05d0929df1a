//! Password policy enforced before any change request is sent.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum password length.
pub const MIN_LENGTH: usize = 8;

/// Symbols of which at least one is required.
pub const SYMBOLS: &str = "@$!%*?&";

static ALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").expect("Invalid regex"));

/// Local validation failure. Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// New password and its confirmation differ (forced change form).
    #[error("New passwords do not match")]
    Mismatch,
    /// Confirmation differs on the user management reset form.
    #[error("Passwords do not match")]
    ResetMismatch,
    /// Password does not satisfy the strength rules.
    #[error(
        "Password must be at least 8 characters with uppercase, lowercase, number, and special character"
    )]
    Weak,
}

/// Strength rules for admin passwords.
///
/// A password is accepted when it is at least [`MIN_LENGTH`] characters long,
/// uses only ASCII letters, digits and [`SYMBOLS`], and contains at least one
/// of each: lowercase letter, uppercase letter, digit, symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Check only the strength rules.
    pub fn check_strength(password: &str) -> Result<(), PasswordError> {
        let strong = ALLOWED_RE.is_match(password)
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| SYMBOLS.contains(c));
        if strong {
            Ok(())
        } else {
            Err(PasswordError::Weak)
        }
    }

    /// Validate the forced password change form.
    ///
    /// The confirmation is compared first, then the strength rules apply.
    pub fn check(new_password: &str, confirmation: &str) -> Result<(), PasswordError> {
        if new_password != confirmation {
            return Err(PasswordError::Mismatch);
        }
        Self::check_strength(new_password)
    }

    /// Validate the password reset form used in user management.
    ///
    /// Strength is checked before the confirmation.
    pub fn check_reset(new_password: &str, confirmation: &str) -> Result<(), PasswordError> {
        Self::check_strength(new_password)?;
        if new_password == confirmation {
            Ok(())
        } else {
            Err(PasswordError::ResetMismatch)
        }
    }
}
