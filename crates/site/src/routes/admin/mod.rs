//! HTTP route handlers for the admin area.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! GET  /admin/login                  - Login page
//! POST /admin/login                  - Login action
//! GET  /admin/change-password        - Forced password change form
//! POST /admin/change-password        - Change password action
//! GET  /admin/logout                 - Logout (idle timer)
//! POST /admin/logout                 - Logout
//!
//! # Protected (session gate + idle timeout)
//! POST /admin/activity               - Record activity
//! GET  /admin                        - Dashboard
//! GET  /admin/dashboard              - Dashboard
//! GET  /admin/content                - Section editor
//! POST /admin/content/{section}      - Editor action
//! GET  /admin/products               - Product list
//! GET  /admin/products/new           - New product form
//! POST /admin/products               - Create product
//! GET  /admin/products/{id}/edit     - Edit product form
//! POST /admin/products/{id}          - Update product
//! GET  /admin/products/{id}/delete   - Confirm deletion
//! POST /admin/products/{id}/delete   - Delete product
//! (same set under /admin/services)
//! GET  /admin/categories             - Category list
//! POST /admin/categories             - Create category
//! GET  /admin/categories/{id}/delete - Confirm deletion
//! POST /admin/categories/{id}/delete - Delete category
//! GET  /admin/quotes                 - Quote inbox
//! POST /admin/quotes/{id}/status     - Change status
//! GET  /admin/quotes/{id}/reply      - Reply by email
//! GET  /admin/quotes/{id}/whatsapp   - Reply on WhatsApp
//!
//! # Users (super admin only)
//! GET  /admin/users                  - User list
//! POST /admin/users                  - Create user
//! POST /admin/users/{id}/toggle      - Activate/deactivate
//! GET  /admin/users/{id}/password    - Set password form
//! POST /admin/users/{id}/password    - Set password
//! ```

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod content;
pub mod dashboard;
pub mod form;
pub mod quotes;
pub mod users;

use askama::Template;
use axum::{
    Router, middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use reshow_core::auth::{AdminUser, IDLE_POLL_INTERVAL_SECS};
use reshow_core::catalog::CatalogKind;

use crate::backend::ApiError;
use crate::error::BackendUnauthorized;
use crate::middleware::{CurrentAdmin, admin_session_middleware};
use crate::state::AppState;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub is_super_admin: bool,
}

impl From<&AdminUser> for AdminUserView {
    fn from(user: &AdminUser) -> Self {
        Self {
            name: user.display_name().to_string(),
            email: user.email.clone(),
            is_super_admin: user.role.can_manage_users(),
        }
    }
}

/// A sidebar entry.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Chrome around every protected admin page.
#[derive(Debug, Clone)]
pub struct AdminLayout {
    pub admin_user: AdminUserView,
    pub menu: Vec<MenuItem>,
    pub idle_timeout_secs: i64,
    pub idle_poll_secs: i64,
}

impl AdminLayout {
    /// Layout for the page under `current_path`.
    #[must_use]
    pub fn new(state: &AppState, admin: &CurrentAdmin, current_path: &str) -> Self {
        let admin_user = AdminUserView::from(&admin.user);
        let mut items = vec![
            ("/admin/dashboard", "Dashboard"),
            ("/admin/products", "Products"),
            ("/admin/categories", "Categories"),
            ("/admin/services", "Services"),
            ("/admin/quotes", "Quote Requests"),
            ("/admin/content", "Content Management"),
        ];
        if admin_user.is_super_admin {
            items.push(("/admin/users", "Users"));
        }
        Self {
            menu: items
                .into_iter()
                .map(|(path, label)| MenuItem {
                    path,
                    label,
                    active: current_path.starts_with(path),
                })
                .collect(),
            admin_user,
            idle_timeout_secs: state.config().idle_timeout_secs,
            idle_poll_secs: IDLE_POLL_INTERVAL_SECS,
        }
    }
}

/// Inline banner shown when a list could not be loaded.
#[derive(Debug, Clone)]
pub struct LoadError {
    pub message: String,
    pub retry: bool,
}

impl LoadError {
    #[must_use]
    pub fn new(err: &ApiError) -> Self {
        Self {
            message: err.user_message(),
            retry: err.is_transient(),
        }
    }
}

/// Destructive-action guard shown before a delete.
#[derive(Template)]
#[template(path = "admin/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub layout: AdminLayout,
    pub heading: String,
    pub question: String,
    pub note: Option<String>,
    pub action: String,
    pub cancel: String,
}

/// Body of a confirmed delete.
#[derive(Debug, Default, serde::Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteForm {
    /// Whether the guard was passed.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

/// Render an admin template.
pub fn render(template: &impl Template) -> Response {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
    .into_response()
}

/// Render an admin page, marked for the unauthorized middleware when a
/// backend read answered 401.
pub fn render_after(template: &impl Template, errors: &[Option<&ApiError>]) -> Response {
    let mut response = render(template);
    if errors.iter().flatten().any(|e| e.is_unauthorized()) {
        response.extensions_mut().insert(BackendUnauthorized);
    }
    response
}

/// Create the admin routes router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/activity", post(auth::activity))
        .route("/content", get(content::editor))
        .route("/content/{section}", post(content::submit))
        .nest("/products", catalog::routes(CatalogKind::Product))
        .nest("/services", catalog::routes(CatalogKind::Service))
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}/delete",
            get(categories::confirm_delete).post(categories::delete),
        )
        .route("/quotes", get(quotes::index))
        .route("/quotes/{id}/status", post(quotes::set_status))
        .route("/quotes/{id}/reply", get(quotes::reply))
        .route("/quotes/{id}/whatsapp", get(quotes::whatsapp))
        .route("/users", get(users::index).post(users::create))
        .route("/users/{id}/toggle", post(users::toggle))
        .route(
            "/users/{id}/password",
            get(users::password_form).post(users::set_password),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_session_middleware,
        ));

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route(
            "/change-password",
            get(auth::change_password_page).post(auth::change_password),
        )
        .route("/logout", get(auth::logout).post(auth::logout))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshow_core::AdminUserId;
    use reshow_core::types::Role;
    use secrecy::SecretString;

    use crate::config::tests::test_config;

    fn admin(role: Role) -> CurrentAdmin {
        CurrentAdmin {
            user: AdminUser {
                id: AdminUserId::new(1),
                full_name: "Rudo".to_string(),
                email: "rudo@reshow.co.zw".to_string(),
                role,
                must_change_password: false,
                is_active: true,
            },
            token: SecretString::from("tok"),
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_menu_depends_on_role() {
        let state = AppState::new(test_config("http://127.0.0.1:9/api")).unwrap();

        let layout = AdminLayout::new(&state, &admin(Role::Admin), "/admin/quotes");
        assert!(!layout.menu.iter().any(|m| m.path == "/admin/users"));
        let active: Vec<_> = layout.menu.iter().filter(|m| m.active).map(|m| m.label).collect();
        assert_eq!(active, vec!["Quote Requests"]);

        let layout = AdminLayout::new(&state, &admin(Role::SuperAdmin), "/admin/users/4/password");
        assert!(layout.menu.iter().any(|m| m.path == "/admin/users" && m.active));
        assert_eq!(layout.idle_poll_secs, 10);
    }
}
