//! Session middleware configuration.
//!
//! Sessions live in an in-memory store and the cookie carries no max-age,
//! so a session ends with the browser session. The cookie is signed with
//! the configured session secret.

use secrecy::ExposeSecret;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "reshow_session";

/// Session keys.
pub mod keys {
    /// Bearer token issued by the backend.
    pub const ADMIN_TOKEN: &str = "adminToken";
    /// Cached `AdminUser` of the token.
    pub const ADMIN_USER: &str = "adminUser";
    /// Token stored by older clients; read as a fallback, always cleared.
    pub const LEGACY_TOKEN: &str = "token";
    /// User stored by older clients; always cleared.
    pub const LEGACY_USER: &str = "user";
    /// User id waiting for a forced password change.
    pub const PENDING_PASSWORD_CHANGE: &str = "pendingPasswordChange";
    /// Serialized `IdleTracker`.
    pub const LAST_ACTIVITY: &str = "lastActivity";
    /// Set once the token was confirmed by `GET /auth/me`.
    pub const SESSION_VERIFIED: &str = "sessionVerified";
    /// The visitor's `QuoteCart`.
    pub const QUOTE_CART: &str = "quoteCart";
    /// Set once this browser session was counted as a visit.
    pub const VISITOR_TRACKED: &str = "visitorTracked";
}

/// Error building the session layer.
#[derive(Debug, thiserror::Error)]
#[error("invalid session secret: {0}")]
pub struct SessionKeyError(#[from] tower_sessions::cookie::KeyError);

/// Create the session layer with an in-memory store.
///
/// # Errors
///
/// Returns an error if the session secret is too short to derive a
/// signing key.
pub fn create_session_layer(
    config: &SiteConfig,
) -> Result<SessionManagerLayer<MemoryStore, tower_sessions::service::SignedCookie>, SessionKeyError>
{
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
