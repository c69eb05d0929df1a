//! User management (super admin only).

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::AdminUserId;
use reshow_core::auth::{AdminUser, NewAdminUser, PasswordPolicy, PasswordReset};
use serde::Deserialize;
use tracing::instrument;

use super::{AdminLayout, LoadError, render, render_after};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{CurrentAdmin, RequireSuperAdmin};
use crate::routes::Flash;
use crate::state::AppState;

const USERS_PATH: &str = "/admin/users";

/// One account in the list.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: AdminUserId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub is_self: bool,
}

impl UserRow {
    fn new(user: &AdminUser, current: &AdminUser) -> Self {
        Self {
            id: user.id,
            name: user.display_name().to_string(),
            email: user.email.clone(),
            role: user.role.to_string(),
            is_active: user.is_active,
            is_self: user.id == current.id,
        }
    }
}

/// User list with the create form.
#[derive(Template)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub layout: AdminLayout,
    pub users: Vec<UserRow>,
    pub form: NewAdminUser,
    pub load_error: Option<LoadError>,
    pub flash: Flash,
}

/// Set-password form for one user.
#[derive(Template)]
#[template(path = "admin/user_password.html")]
pub struct UserPasswordTemplate {
    pub layout: AdminLayout,
    pub user_name: String,
    pub action: String,
    pub error: Option<String>,
}

/// Activate/deactivate form.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub active: bool,
}

/// Set-password form body.
#[derive(Debug, Deserialize)]
pub struct SetPasswordForm {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn back(flash: &Flash) -> Response {
    Redirect::to(&flash.redirect_url(USERS_PATH)).into_response()
}

async fn list_page(
    state: &AppState,
    admin: &CurrentAdmin,
    form: NewAdminUser,
    flash: Flash,
) -> Response {
    let result = state.backend().users(&admin.token).await;
    let (users, load_error) = match &result {
        Ok(users) => (
            users.iter().map(|u| UserRow::new(u, &admin.user)).collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch users: {e}");
            (Vec::new(), Some(LoadError::new(e)))
        }
    };

    let template = UsersTemplate {
        layout: AdminLayout::new(state, admin, USERS_PATH),
        users,
        form,
        load_error,
        flash,
    };
    render_after(&template, &[result.as_ref().err()])
}

/// List admin users.
///
/// GET /admin/users
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Query(flash): Query<Flash>,
) -> Response {
    list_page(&state, &admin, NewAdminUser::default(), flash).await
}

/// Create an admin user with the default password.
///
/// Incomplete forms are re-shown with what was typed.
///
/// POST /admin/users
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Form(form): Form<NewAdminUser>,
) -> Result<Response> {
    let user = match form.validated() {
        Ok(user) => user,
        Err(e) => return Ok(list_page(&state, &admin, form, Flash::error(e.to_string())).await),
    };

    match state.backend().create_user(&admin.token, &user).await {
        Ok(()) => {
            add_breadcrumb("users", "Created admin user", None);
            tracing::info!(email = %user.email, "Admin user created");
            Ok(back(&Flash::success(NewAdminUser::created_notice())))
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            let flash = Flash::error(e.message_or("Failed to create user"));
            Ok(list_page(&state, &admin, user, flash).await)
        }
    }
}

/// Activate or deactivate a user.
///
/// POST /admin/users/{id}/toggle
#[instrument(skip(state, admin))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<AdminUserId>,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    match state
        .backend()
        .set_user_active(&admin.token, id, form.active)
        .await
    {
        Ok(()) => {
            tracing::info!(user_id = %id, active = form.active, "Admin user status updated");
            let notice = if form.active {
                "User activated successfully"
            } else {
                "User deactivated successfully"
            };
            Ok(back(&Flash::success(notice)))
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!(user_id = %id, "Failed to update user status: {e}");
            Ok(back(&Flash::error(
                e.message_or("Failed to update user status"),
            )))
        }
    }
}

async fn user_name(state: &AppState, admin: &CurrentAdmin, id: AdminUserId) -> Result<Option<String>> {
    let users = state.backend().users(&admin.token).await?;
    Ok(users
        .into_iter()
        .find(|u| u.id == id)
        .map(|u| u.display_name().to_string()))
}

fn password_page(
    state: &AppState,
    admin: &CurrentAdmin,
    id: AdminUserId,
    user_name: String,
    error: Option<String>,
) -> Response {
    render(&UserPasswordTemplate {
        layout: AdminLayout::new(state, admin, USERS_PATH),
        user_name,
        action: format!("{USERS_PATH}/{id}/password"),
        error,
    })
}

/// Display the set-password form.
///
/// GET /admin/users/{id}/password
#[instrument(skip(state, admin))]
pub async fn password_form(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<AdminUserId>,
) -> Result<Response> {
    let Some(name) = user_name(&state, &admin, id).await? else {
        return Ok(back(&Flash::error("User not found")));
    };
    Ok(password_page(&state, &admin, id, name, None))
}

/// Set another user's password.
///
/// The policy is checked locally; nothing is sent when it fails.
///
/// POST /admin/users/{id}/password
#[instrument(skip(state, admin, form))]
pub async fn set_password(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<AdminUserId>,
    Form(form): Form<SetPasswordForm>,
) -> Result<Response> {
    let Some(name) = user_name(&state, &admin, id).await? else {
        return Ok(back(&Flash::error("User not found")));
    };

    if let Err(e) = PasswordPolicy::check_reset(&form.new_password, &form.confirm_password) {
        return Ok(password_page(&state, &admin, id, name, Some(e.to_string())));
    }

    let reset = PasswordReset {
        new_password: form.new_password,
    };
    match state.backend().set_user_password(&admin.token, id, &reset).await {
        Ok(()) => {
            add_breadcrumb("users", "Set admin user password", None);
            tracing::info!(user_id = %id, "Admin user password set");
            Ok(back(&Flash::success("Password changed successfully")))
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!(user_id = %id, "Failed to change password: {e}");
            let message = e.message_or("Failed to change password");
            Ok(password_page(&state, &admin, id, name, Some(message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshow_core::types::Role;

    fn user(id: i64, role: Role) -> AdminUser {
        AdminUser {
            id: AdminUserId::new(id),
            full_name: format!("User {id}"),
            email: format!("u{id}@reshow.co.zw"),
            role,
            must_change_password: false,
            is_active: true,
        }
    }

    #[test]
    fn test_user_row_marks_self() {
        let me = user(1, Role::SuperAdmin);
        let row = UserRow::new(&me, &me);
        assert!(row.is_self);
        assert_eq!(row.role, "superadmin");

        let other = UserRow::new(&user(2, Role::Admin), &me);
        assert!(!other.is_self);
        assert_eq!(other.role, "admin");
    }
}
