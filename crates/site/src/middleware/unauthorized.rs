//! Central reaction to the backend rejecting a token.
//!
//! Handlers never deal with a 401 themselves: the error (or a page that
//! rendered with fallbacks) carries a [`BackendUnauthorized`] marker and this
//! middleware clears the stored credentials. Admin pages other than the
//! login page then redirect to login; public pages render as they are.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::auth::{LOGIN_PATH, UnauthorizedAction, unauthorized_action};
use tower_sessions::Session;

use super::admin_session::AdminSession;
use crate::error::{BackendUnauthorized, clear_sentry_user};

/// Clear credentials when the backend answered 401.
pub async fn unauthorized_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let session = request.extensions().get::<Session>().cloned();

    let response = next.run(request).await;
    if response.extensions().get::<BackendUnauthorized>().is_none() {
        return response;
    }

    tracing::info!(path = %path, "Backend rejected the stored token, clearing credentials");
    if let Some(session) = session
        && let Err(e) = AdminSession::new(session).clear().await
    {
        tracing::error!("Failed to clear admin session: {e}");
    }
    clear_sentry_user();

    match unauthorized_action(&path) {
        UnauthorizedAction::ClearAndRedirect => Redirect::to(LOGIN_PATH).into_response(),
        UnauthorizedAction::ClearOnly => response,
    }
}
