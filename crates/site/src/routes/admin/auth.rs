//! Admin login, forced password change and logout.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::auth::{
    AuthState, Credentials, IDLE_NOTICE, LOGIN_PATH, LoginOutcome, PasswordChange, PasswordPolicy,
};
use serde::Deserialize;
use tracing::instrument;

use super::render;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::AdminSession;
use crate::middleware::admin_session::IDLE_LOGIN_PATH;
use crate::middleware::auth::CHANGE_PASSWORD_PATH;
use crate::state::AppState;

/// Landing page after a successful login.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

const LOGIN_FAILED: &str = "Login failed";
const CHANGE_FAILED: &str = "Failed to change password";

/// Login page template.
#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Forced password change template.
#[derive(Template)]
#[template(path = "admin/change_password.html")]
pub struct ChangePasswordTemplate {
    pub error: Option<String>,
}

/// Query of the login and logout pages.
#[derive(Debug, Default, Deserialize)]
pub struct ReasonQuery {
    #[serde(default)]
    pub reason: Option<String>,
}

impl ReasonQuery {
    fn is_idle(&self) -> bool {
        self.reason.as_deref() == Some("idle")
    }
}

/// Forced password change form.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn transition_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Invalid auth transition: {e}"))
}

/// Display the login page.
///
/// GET /admin/login
#[instrument(skip(admin))]
pub async fn login_page(admin: AdminSession, Query(query): Query<ReasonQuery>) -> Response {
    if admin.auth_state().await.is_authenticated() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    render(&LoginTemplate {
        email: String::new(),
        error: None,
        notice: query.is_idle().then(|| IDLE_NOTICE.to_string()),
    })
}

/// Log in with email and password.
///
/// POST /admin/login
#[instrument(skip(state, admin, credentials), fields(email = %credentials.email))]
pub async fn login(
    State(state): State<AppState>,
    admin: AdminSession,
    Form(credentials): Form<Credentials>,
) -> Result<Response> {
    let idle_timeout_secs = state.config().idle_timeout_secs;
    let mut auth = admin.auth_state().await;
    auth.begin_login().map_err(transition_error)?;

    let outcome = match state.backend().login(&credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            auth.login_failed();
            admin.commit(&auth, None, idle_timeout_secs).await?;
            tracing::warn!("Login failed: {e}");
            return Ok(render(&LoginTemplate {
                email: credentials.email,
                error: Some(e.message_or(LOGIN_FAILED)),
                notice: None,
            }));
        }
    };
    let token = outcome.token().map(ToString::to_string);
    auth.login_succeeded(outcome).map_err(transition_error)?;
    admin
        .commit(&auth, token.as_deref(), idle_timeout_secs)
        .await?;

    match &auth {
        AuthState::Authenticated(user) => {
            set_sentry_user(&user.id, Some(&user.email));
            add_breadcrumb("auth", "Admin logged in", None);
            tracing::info!(user_id = %user.id, "Admin logged in");
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        AuthState::PasswordChangeRequired(user_id) => {
            tracing::info!(user_id = %user_id, "Password change required");
            Ok(Redirect::to(CHANGE_PASSWORD_PATH).into_response())
        }
        AuthState::Anonymous | AuthState::Authenticating => {
            Err(transition_error("login ended without a session"))
        }
    }
}

/// Display the forced password change form.
///
/// GET /admin/change-password
#[instrument(skip(admin))]
pub async fn change_password_page(admin: AdminSession) -> Response {
    if !matches!(
        admin.auth_state().await,
        AuthState::PasswordChangeRequired(_)
    ) {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    render(&ChangePasswordTemplate { error: None })
}

/// Rotate the password and start the session.
///
/// The policy is checked locally; nothing is sent when it fails.
///
/// POST /admin/change-password
#[instrument(skip(state, admin, form))]
pub async fn change_password(
    State(state): State<AppState>,
    admin: AdminSession,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response> {
    let mut auth = admin.auth_state().await;
    let AuthState::PasswordChangeRequired(user_id) = auth else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    if let Err(e) = PasswordPolicy::check(&form.new_password, &form.confirm_password) {
        return Ok(render(&ChangePasswordTemplate {
            error: Some(e.to_string()),
        }));
    }

    let change = PasswordChange {
        user_id,
        current_password: form.current_password,
        new_password: form.new_password,
    };
    let (token, user) = match state.backend().change_password(&change).await {
        Ok(issued) => issued,
        Err(e) => {
            tracing::warn!("Password change failed: {e}");
            return Ok(render(&ChangePasswordTemplate {
                error: Some(e.message_or(CHANGE_FAILED)),
            }));
        }
    };

    auth.password_changed(user.clone())
        .map_err(transition_error)?;
    admin
        .commit(&auth, Some(&token), state.config().idle_timeout_secs)
        .await?;
    set_sentry_user(&user.id, Some(&user.email));
    add_breadcrumb("auth", "Admin changed password", None);
    tracing::info!(user_id = %user.id, "Password changed");
    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

/// Clear every stored credential and return to the login page.
///
/// GET|POST /admin/logout
#[instrument(skip(state, admin))]
pub async fn logout(
    State(state): State<AppState>,
    admin: AdminSession,
    Query(query): Query<ReasonQuery>,
) -> Result<Redirect> {
    let mut auth = admin.auth_state().await;
    auth.logout();
    admin
        .commit(&auth, None, state.config().idle_timeout_secs)
        .await?;
    clear_sentry_user();
    let to = if query.is_idle() {
        IDLE_LOGIN_PATH
    } else {
        LOGIN_PATH
    };
    Ok(Redirect::to(to))
}

/// Record activity; the admin gate has already touched the idle timer.
///
/// POST /admin/activity
pub async fn activity() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_query() {
        assert!(
            ReasonQuery {
                reason: Some("idle".to_string())
            }
            .is_idle()
        );
        assert!(!ReasonQuery::default().is_idle());
    }
}
