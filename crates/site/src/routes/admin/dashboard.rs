//! Admin dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Response};
use tracing::instrument;

use super::{AdminLayout, render_after};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// One counter on the dashboard.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub layout: AdminLayout,
    pub stats: Option<Vec<StatCard>>,
}

/// Dashboard page handler.
///
/// GET /admin, GET /admin/dashboard
#[instrument(skip(state, admin))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Response {
    let result = state.backend().dashboard(&admin.token).await;

    let stats = match &result {
        Ok(stats) => Some(
            stats
                .cards()
                .into_iter()
                .map(|(label, value)| StatCard { label, value })
                .collect(),
        ),
        Err(e) => {
            tracing::error!("Failed to fetch dashboard stats: {e}");
            None
        }
    };

    let template = DashboardTemplate {
        layout: AdminLayout::new(&state, &admin, "/admin/dashboard"),
        stats,
    };
    render_after(&template, &[result.as_ref().err()])
}
