//! The admin session store and the gate in front of admin pages.
//!
//! [`AdminSession`] is the only code that reads or writes admin credentials
//! in the session. [`admin_session_middleware`] runs on every protected
//! admin route: it verifies a restored session once against the backend
//! and enforces the idle timeout.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use reshow_core::AdminUserId;
use reshow_core::auth::{AdminUser, AuthState, IdlePoll, IdleTracker, LOGIN_PATH};
use secrecy::SecretString;
use tower_sessions::Session;
use tracing::{debug, warn};

use super::session::keys;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::state::AppState;

/// Where an idle-expired admin is sent.
pub const IDLE_LOGIN_PATH: &str = "/admin/login?reason=idle";

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Admin credentials stored in the visitor's session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    session: Session,
}

impl AdminSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The cached user of the current token.
    pub async fn current_user(&self) -> Option<AdminUser> {
        self.session.get(keys::ADMIN_USER).await.ok().flatten()
    }

    /// The bearer token, falling back to the legacy key.
    pub async fn token(&self) -> Option<SecretString> {
        let token: Option<String> = match self.session.get(keys::ADMIN_TOKEN).await.ok().flatten() {
            Some(token) => Some(token),
            None => self.session.get(keys::LEGACY_TOKEN).await.ok().flatten(),
        };
        token.filter(|t| !t.is_empty()).map(SecretString::from)
    }

    /// Store a freshly issued token and its user.
    ///
    /// The session id is cycled, legacy keys and any pending password
    /// change are dropped, and the idle timer starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn establish(
        &self,
        token: &str,
        user: &AdminUser,
        idle_timeout_secs: i64,
    ) -> SessionResult<()> {
        self.session.cycle_id().await?;
        self.clear_legacy().await?;
        self.session
            .remove::<AdminUserId>(keys::PENDING_PASSWORD_CHANGE)
            .await?;
        self.session.insert(keys::ADMIN_TOKEN, token).await?;
        self.session.insert(keys::ADMIN_USER, user).await?;
        self.session.insert(keys::SESSION_VERIFIED, true).await?;
        self.store_idle(&IdleTracker::armed(idle_timeout_secs, Utc::now()))
            .await
    }

    /// Remove every stored credential, session-scoped and legacy.
    ///
    /// The visitor's quote cart survives.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear(&self) -> SessionResult<()> {
        self.session.remove::<String>(keys::ADMIN_TOKEN).await?;
        self.session.remove::<AdminUser>(keys::ADMIN_USER).await?;
        self.session
            .remove::<AdminUserId>(keys::PENDING_PASSWORD_CHANGE)
            .await?;
        self.session.remove::<IdleTracker>(keys::LAST_ACTIVITY).await?;
        self.session.remove::<bool>(keys::SESSION_VERIFIED).await?;
        self.clear_legacy().await
    }

    /// Remove the legacy credential keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear_legacy(&self) -> SessionResult<()> {
        self.session.remove::<String>(keys::LEGACY_TOKEN).await?;
        self.session
            .remove::<serde_json::Value>(keys::LEGACY_USER)
            .await?;
        Ok(())
    }

    /// Remember that `user_id` must rotate its password before a token is
    /// issued. Any previous credentials are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn begin_password_change(&self, user_id: AdminUserId) -> SessionResult<()> {
        self.clear().await?;
        self.session
            .insert(keys::PENDING_PASSWORD_CHANGE, user_id)
            .await
    }

    /// The user waiting for a forced password change, if any.
    pub async fn pending_password_change(&self) -> Option<AdminUserId> {
        self.session
            .get(keys::PENDING_PASSWORD_CHANGE)
            .await
            .ok()
            .flatten()
    }

    /// Where the visitor is in the login flow, read from the stored keys.
    ///
    /// A stored user flagged `mustChangePassword` still has to rotate it.
    pub async fn auth_state(&self) -> AuthState {
        if let Some(user_id) = self.pending_password_change().await {
            return AuthState::PasswordChangeRequired(user_id);
        }
        match (self.token().await, self.current_user().await) {
            (Some(_), Some(user)) if user.must_change_password => {
                AuthState::PasswordChangeRequired(user.id)
            }
            (Some(_), Some(user)) => AuthState::Authenticated(user),
            _ => AuthState::Anonymous,
        }
    }

    /// Store `state` as the session's credentials.
    ///
    /// An authenticated state needs the issued `token`; without one, and for
    /// every other state without a pending change, all credentials are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn commit(
        &self,
        state: &AuthState,
        token: Option<&str>,
        idle_timeout_secs: i64,
    ) -> SessionResult<()> {
        match (state, token) {
            (AuthState::Authenticated(user), Some(token)) => {
                self.establish(token, user, idle_timeout_secs).await
            }
            (AuthState::PasswordChangeRequired(user_id), _) => {
                self.begin_password_change(*user_id).await
            }
            _ => self.clear().await,
        }
    }

    async fn is_verified(&self) -> bool {
        self.session
            .get::<bool>(keys::SESSION_VERIFIED)
            .await
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    async fn mark_verified(&self, user: &AdminUser) -> SessionResult<()> {
        self.session.insert(keys::ADMIN_USER, user).await?;
        self.session.insert(keys::SESSION_VERIFIED, true).await
    }

    async fn idle_tracker(&self) -> Option<IdleTracker> {
        self.session.get(keys::LAST_ACTIVITY).await.ok().flatten()
    }

    async fn store_idle(&self, tracker: &IdleTracker) -> SessionResult<()> {
        self.session.insert(keys::LAST_ACTIVITY, tracker).await
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self::new)
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session layer is not configured",
            ))
    }
}

/// Clear the session and send the browser to `to`.
async fn expel(admin: &AdminSession, to: &str) -> Response {
    if let Err(e) = admin.clear().await {
        tracing::error!("Failed to clear admin session: {e}");
    }
    clear_sentry_user();
    Redirect::to(to).into_response()
}

/// Gate for protected admin routes.
///
/// 1. Without a stored token and user, legacy keys are cleared and the
///    request continues; the route's auth extractor redirects to login.
/// 2. A restored session is verified once against `GET /auth/me`: a 401
///    clears it and redirects to login, success refreshes the cached user,
///    and any other failure keeps the optimistic user.
/// 3. The idle timer is polled, allowing one browser poll interval for
///    batched activity reports: an expired timer clears the session and
///    redirects to login with the inactivity notice; otherwise the
///    request counts as activity.
pub async fn admin_session_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session) = request.extensions().get::<Session>().cloned() else {
        return next.run(request).await;
    };
    let admin = AdminSession::new(session);

    let (Some(token), Some(mut user)) = (admin.token().await, admin.current_user().await) else {
        if let Err(e) = admin.clear_legacy().await {
            warn!("Failed to clear legacy credentials: {e}");
        }
        return next.run(request).await;
    };

    if !admin.is_verified().await {
        match state.backend().me(&token).await {
            Ok(verified) => {
                if let Err(e) = admin.mark_verified(&verified).await {
                    warn!("Failed to store verified user: {e}");
                }
                user = verified;
            }
            Err(e) if e.is_unauthorized() => {
                debug!("Stored admin token rejected by backend");
                return expel(&admin, LOGIN_PATH).await;
            }
            Err(e) => warn!("Could not verify admin session, keeping cached user: {e}"),
        }
    }

    let now = Utc::now();
    let mut tracker = admin
        .idle_tracker()
        .await
        .unwrap_or_else(|| IdleTracker::armed(state.config().idle_timeout_secs, now));
    if tracker.poll_request(now) == IdlePoll::Expired {
        debug!(user_id = %user.id, "Admin session idle, logging out");
        return expel(&admin, IDLE_LOGIN_PATH).await;
    }
    tracker.touch(now);
    if let Err(e) = admin.store_idle(&tracker).await {
        warn!("Failed to record admin activity: {e}");
    }

    set_sentry_user(&user.id, Some(&user.email));
    next.run(request).await
}
