//! Status and role enums shared by the site and its backend.

use serde::{Deserialize, Serialize};

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access including user management.
    #[serde(alias = "super_admin")]
    SuperAdmin,
    /// Content, catalog and quote management.
    #[default]
    Admin,
}

impl Role {
    /// Whether this role may manage other admin users.
    #[must_use]
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "superadmin"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" | "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// Quote request workflow status.
///
/// Transitions are independent idempotent updates; any status may be set
/// from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl QuoteStatus {
    /// Every status, in the order the inbox offers them.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Button label used by the inbox.
    #[must_use]
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approve",
            Self::Rejected => "Reject",
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid quote status: {s}")),
        }
    }
}

/// How the company name appears in the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogoDisplay {
    /// Text wordmark only.
    #[default]
    Text,
    /// Logo image only (falls back to text when no image is set).
    Logo,
    /// Logo image and wordmark together.
    Both,
}

impl LogoDisplay {
    /// Every option, in selector order.
    pub const ALL: [Self; 3] = [Self::Text, Self::Logo, Self::Both];

    /// Parse a stored value, treating anything unknown as `Text`.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Logo => "logo",
            Self::Both => "both",
        }
    }

    /// Selector label in the content editor.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text Only",
            Self::Logo => "Logo Only (requires logo image)",
            Self::Both => "Logo and Text Together",
        }
    }

    /// Whether the logo image is rendered.
    #[must_use]
    pub const fn shows_logo(self, has_image: bool) -> bool {
        has_image && matches!(self, Self::Logo | Self::Both)
    }

    /// Whether the text wordmark is rendered.
    ///
    /// `Logo` without an image falls back to text so the navbar is never empty.
    #[must_use]
    pub const fn shows_text(self, has_image: bool) -> bool {
        match self {
            Self::Text | Self::Both => true,
            Self::Logo => !has_image,
        }
    }
}

impl std::str::FromStr for LogoDisplay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "logo" => Ok(Self::Logo),
            "both" => Ok(Self::Both),
            _ => Err(format!("invalid logo display: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let role: Role = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert!(Role::SuperAdmin.can_manage_users());
        assert!(!Role::Admin.can_manage_users());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("viewer".parse::<Role>().is_err());
    }

    #[test]
    fn test_quote_status_round_trip() {
        for status in QuoteStatus::ALL {
            assert_eq!(status.as_str().parse::<QuoteStatus>().unwrap(), status);
        }
        assert!("done".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn test_logo_display_rules() {
        assert!(LogoDisplay::Text.shows_text(true));
        assert!(!LogoDisplay::Text.shows_logo(true));
        assert!(LogoDisplay::Logo.shows_logo(true));
        assert!(!LogoDisplay::Logo.shows_text(true));
        assert!(LogoDisplay::Both.shows_logo(true));
        assert!(LogoDisplay::Both.shows_text(true));
    }

    #[test]
    fn test_logo_without_image_falls_back_to_text() {
        assert!(!LogoDisplay::Logo.shows_logo(false));
        assert!(LogoDisplay::Logo.shows_text(false));
        assert!(!LogoDisplay::Both.shows_logo(false));
    }

    #[test]
    fn test_logo_display_from_stored_defaults_to_text() {
        assert_eq!(LogoDisplay::from_stored("both"), LogoDisplay::Both);
        assert_eq!(LogoDisplay::from_stored(""), LogoDisplay::Text);
        assert_eq!(LogoDisplay::from_stored("banner"), LogoDisplay::Text);
    }
}
