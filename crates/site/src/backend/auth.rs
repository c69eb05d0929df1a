//! Authentication endpoints.

use reshow_core::auth::{AdminUser, Credentials, LoginOutcome, LoginResponse, PasswordChange};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, BackendClient};

/// `{token, user}` issued after a password change.
#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    user: AdminUser,
}

impl BackendClient {
    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (usually `BadRequest` or `Unauthorized`
    /// with a message), or `Parse` when the response is neither a session nor
    /// a password-change demand.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ApiError> {
        let response: LoginResponse = self.post("/auth/login", None, credentials).await?;
        response
            .into_outcome()
            .ok_or_else(|| ApiError::Parse("Login response carried no token".to_string()))
    }

    /// Rotate a password and receive a session.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the current password or the
    /// request fails.
    #[instrument(skip(self, change), fields(user_id = %change.user_id))]
    pub async fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<(String, AdminUser), ApiError> {
        let response: TokenResponse = self.post("/auth/change-password", None, change).await?;
        Ok((response.token, response.user))
    }

    /// The user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the token is no longer valid.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &SecretString) -> Result<AdminUser, ApiError> {
        self.get("/auth/me", Some(token)).await
    }
}
