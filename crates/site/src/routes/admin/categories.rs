//! Category management.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::CategoryId;
use reshow_core::catalog::Category;
use serde::Deserialize;
use tracing::instrument;

use super::{AdminLayout, ConfirmDeleteTemplate, DeleteForm, LoadError, render, render_after};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::Flash;
use crate::state::AppState;

const CATEGORIES_PATH: &str = "/admin/categories";

/// Category list template.
#[derive(Template)]
#[template(path = "admin/categories.html")]
pub struct CategoriesTemplate {
    pub layout: AdminLayout,
    pub categories: Vec<Category>,
    pub load_error: Option<LoadError>,
    pub flash: Flash,
}

/// New category form.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

fn back(flash: &Flash) -> Response {
    Redirect::to(&flash.redirect_url(CATEGORIES_PATH)).into_response()
}

/// List categories.
///
/// GET /admin/categories
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(flash): Query<Flash>,
) -> Response {
    let result = state.backend().categories(Some(&admin.token)).await;
    let (categories, load_error) = match &result {
        Ok(categories) => (categories.clone(), None),
        Err(e) => {
            tracing::error!("Failed to fetch categories: {e}");
            (Vec::new(), Some(LoadError::new(e)))
        }
    };

    let template = CategoriesTemplate {
        layout: AdminLayout::new(&state, &admin, CATEGORIES_PATH),
        categories,
        load_error,
        flash,
    };
    render_after(&template, &[result.as_ref().err()])
}

/// Create a category.
///
/// POST /admin/categories
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(back(&Flash::error("Category name is required")));
    }

    match state.backend().create_category(&admin.token, name).await {
        Ok(()) => {
            add_breadcrumb("catalog", "Created category", Some(&[("name", name)]));
            tracing::info!(name, "Category created");
            Ok(back(&Flash::success("Category created successfully")))
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!("Failed to create category: {e}");
            Ok(back(&Flash::error(e.message_or("Failed to create category"))))
        }
    }
}

/// Ask before deleting.
///
/// GET /admin/categories/{id}/delete
#[instrument(skip(state, admin))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<Response> {
    let categories = state.backend().categories(Some(&admin.token)).await?;
    let Some(category) = categories.into_iter().find(|c| c.id == id) else {
        return Ok(back(&Flash::error("Category not found")));
    };

    Ok(render(&ConfirmDeleteTemplate {
        layout: AdminLayout::new(&state, &admin, CATEGORIES_PATH),
        heading: "Delete Category".to_string(),
        question: format!(
            "Are you sure you want to delete the category \"{}\"?",
            category.name
        ),
        note: Some("Note: You cannot delete a category if products are using it.".to_string()),
        action: format!("{CATEGORIES_PATH}/{id}/delete"),
        cancel: CATEGORIES_PATH.to_string(),
    }))
}

/// Delete a category once confirmed.
///
/// The backend refuses (409) while products still use it; its message is
/// shown and the category stays listed.
///
/// POST /admin/categories/{id}/delete
#[instrument(skip(state, admin, form))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    if !form.confirmed() {
        return Ok(Redirect::to(&format!("{CATEGORIES_PATH}/{id}/delete")).into_response());
    }

    match state.backend().delete_category(&admin.token, id).await {
        Ok(()) => {
            add_breadcrumb("catalog", "Deleted category", None);
            tracing::info!(category_id = %id, "Category deleted");
            Ok(back(&Flash::success("Category deleted successfully")))
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::warn!(category_id = %id, "Failed to delete category: {e}");
            Ok(back(&Flash::error(e.message_or("Failed to delete category"))))
        }
    }
}
