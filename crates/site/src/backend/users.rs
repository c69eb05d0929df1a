//! Admin user management and dashboard counters.

use reshow_core::AdminUserId;
use reshow_core::auth::{ActiveUpdate, AdminUser, NewAdminUser, PasswordReset};
use reshow_core::stats::DashboardStats;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiError, BackendClient};

impl BackendClient {
    /// Every admin user (`GET /admin/users`).
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized`/`Api { status: 403 }` for non-superadmins, or
    /// error if the request fails.
    #[instrument(skip_all)]
    pub async fn users(&self, token: &SecretString) -> Result<Vec<AdminUser>, ApiError> {
        let users: Option<Vec<AdminUser>> = self.get("/admin/users", Some(token)).await?;
        Ok(users.unwrap_or_default())
    }

    /// Create an admin user with the default password (`POST /admin/users`).
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the user or the request fails.
    #[instrument(skip(self, token, user), fields(email = %user.email))]
    pub async fn create_user(&self, token: &SecretString, user: &NewAdminUser) -> Result<(), ApiError> {
        self.post_discarding("/admin/users", Some(token), user)
            .await
    }

    /// Activate or deactivate a user (`PUT /admin/users/:id`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn set_user_active(
        &self,
        token: &SecretString,
        id: AdminUserId,
        is_active: bool,
    ) -> Result<(), ApiError> {
        self.put(
            &format!("/admin/users/{id}"),
            Some(token),
            &ActiveUpdate { is_active },
        )
        .await
    }

    /// Set a user's password (`PUT /admin/users/:id/password`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token, reset), fields(user_id = %id))]
    pub async fn set_user_password(
        &self,
        token: &SecretString,
        id: AdminUserId,
        reset: &PasswordReset,
    ) -> Result<(), ApiError> {
        self.put(&format!("/admin/users/{id}/password"), Some(token), reset)
            .await
    }

    /// Dashboard counters (`GET /admin/dashboard`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn dashboard(&self, token: &SecretString) -> Result<DashboardStats, ApiError> {
        let stats: Option<DashboardStats> = self.get("/admin/dashboard", Some(token)).await?;
        Ok(stats.unwrap_or_default())
    }
}
