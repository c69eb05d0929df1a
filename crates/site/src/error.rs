//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>` for
//! failures that cannot be shown inline on the page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::ApiError;

/// Marker placed on responses caused by a backend 401.
///
/// The unauthorized middleware reacts to it by clearing stored credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendUnauthorized;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_)
                | Self::Template(_)
                | Self::Internal(_)
                | Self::Backend(
                    ApiError::Server { .. }
                        | ApiError::Parse(_)
                        | ApiError::Http(_)
                        | ApiError::Unreachable(_)
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Backend(err) => match err {
                ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
                ApiError::NotFound => StatusCode::NOT_FOUND,
                ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
                ApiError::Conflict { .. } => StatusCode::CONFLICT,
                ApiError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Template(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Backend(err) => err.user_message(),
            _ => self.to_string(),
        };

        let mut response = (status, message).into_response();
        if matches!(self, Self::Backend(ApiError::Unauthorized)) {
            response.extensions_mut().insert(BackendUnauthorized);
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for admin actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("content", "Saved section", Some(&[("section", "hero")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("quote-123".to_string());
        assert_eq!(err.to_string(), "Not found: quote-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Backend(ApiError::Conflict {
                message: "in use".to_string()
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Backend(ApiError::Server { status: 500 })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_backend_unauthorized_is_marked() {
        let response = AppError::Backend(ApiError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.extensions().get::<BackendUnauthorized>().is_some());

        let response = AppError::Unauthorized("no".to_string()).into_response();
        assert!(response.extensions().get::<BackendUnauthorized>().is_none());
    }
}
