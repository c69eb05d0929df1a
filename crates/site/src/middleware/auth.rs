//! Authentication extractors for admin pages.
//!
//! Provides extractors for requiring admin authentication in route handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::auth::{AdminUser, LOGIN_PATH};
use secrecy::SecretString;
use tower_sessions::Session;

use super::admin_session::AdminSession;
use crate::error::AppError;

/// Page an admin with a pending password change is held on.
pub const CHANGE_PASSWORD_PATH: &str = "/admin/change-password";

/// The logged-in admin and the token to act with.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub user: AdminUser,
    pub token: SecretString,
}

/// Extractor that requires admin authentication.
///
/// An admin without a token is sent to the login page; one who still has
/// to rotate their password is sent to the change-password page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.user.display_name())
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// Redirect to the forced password change.
    RedirectToPasswordChange,
    /// The session layer is missing.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::RedirectToPasswordChange => Redirect::to(CHANGE_PASSWORD_PATH).into_response(),
            Self::Unauthorized => {
                AppError::Unauthorized("no session".to_string()).into_response()
            }
        }
    }
}

async fn current_admin(parts: &Parts) -> Result<CurrentAdmin, AdminAuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AdminAuthRejection::Unauthorized)?;
    let admin = AdminSession::new(session);

    if admin.pending_password_change().await.is_some() {
        return Err(AdminAuthRejection::RedirectToPasswordChange);
    }

    let (Some(token), Some(user)) = (admin.token().await, admin.current_user().await) else {
        return Err(AdminAuthRejection::RedirectToLogin);
    };
    if user.must_change_password {
        return Err(AdminAuthRejection::RedirectToPasswordChange);
    }

    Ok(CurrentAdmin { user, token })
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_admin(parts).await.map(Self)
    }
}

/// Extractor that requires super admin authentication.
///
/// If the admin is not logged in, redirects to login.
/// If the admin is not a super admin, returns 403 Forbidden.
pub struct RequireSuperAdmin(pub CurrentAdmin);

/// Error returned when super admin authentication is required.
#[derive(Debug)]
pub enum SuperAdminRejection {
    /// Not logged in, or still changing a password.
    Auth(AdminAuthRejection),
    /// Forbidden - user is admin but not super admin.
    Forbidden,
}

impl IntoResponse for SuperAdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(rejection) => rejection.into_response(),
            Self::Forbidden => {
                AppError::Forbidden("only super admins can manage users".to_string())
                    .into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = SuperAdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = current_admin(parts)
            .await
            .map_err(SuperAdminRejection::Auth)?;

        if !admin.user.role.can_manage_users() {
            return Err(SuperAdminRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}
