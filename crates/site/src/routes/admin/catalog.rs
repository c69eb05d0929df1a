//! Product and service management.
//!
//! Both kinds share one set of handlers; the router for each kind carries
//! its [`CatalogKind`] as a request extension.
//!
//! ```text
//! GET  /                - List
//! POST /                - Create
//! GET  /new             - New form
//! GET  /{id}/edit       - Edit form
//! POST /{id}            - Update
//! GET  /{id}/delete     - Confirm deletion
//! POST /{id}/delete     - Delete (requires confirm=yes)
//! ```

use askama::Template;
use axum::{
    Extension, Form, Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use reshow_core::api_url::resolve_image_url;
use reshow_core::catalog::{
    CatalogForm, CatalogKind, CatalogSubmission, Category, CategoryIndex, CategoryRef,
    DEFAULT_CATEGORIES, Product, Service,
};
use reshow_core::rating::MAX_STARS;
use reshow_core::{ProductId, ServiceId};
use secrecy::SecretString;
use tracing::instrument;

use super::form::SubmittedForm;
use super::{AdminLayout, ConfirmDeleteTemplate, DeleteForm, LoadError, render, render_after};
use crate::backend::{ApiError, BackendClient};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{CurrentAdmin, RequireAdminAuth};
use crate::routes::Flash;
use crate::routes::views::RatingView;
use crate::state::AppState;

/// A product or a service as loaded from the backend.
#[derive(Debug, Clone)]
pub enum CatalogEntry {
    Product(Product),
    Service(Service),
}

impl CatalogEntry {
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Product(p) => p.id.as_i64(),
            Self::Service(s) => s.id.as_i64(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Product(p) => &p.name,
            Self::Service(s) => &s.title,
        }
    }

    fn parts(&self) -> (&str, &str, &str, f64) {
        match self {
            Self::Product(p) => (&p.category, &p.description, &p.image, p.rating),
            Self::Service(s) => (&s.category, &s.description, &s.image, s.rating),
        }
    }

    /// Prefilled edit form.
    #[must_use]
    pub fn to_form(&self, index: &CategoryIndex) -> CatalogForm {
        match self {
            Self::Product(p) => CatalogForm::from_product(p, index),
            Self::Service(s) => CatalogForm::from_service(s, index),
        }
    }
}

fn base_path(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Product => "/admin/products",
        CatalogKind::Service => "/admin/services",
    }
}

fn capitalized(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Product => "Product",
        CatalogKind::Service => "Service",
    }
}

async fn fetch_entries(
    backend: &BackendClient,
    kind: CatalogKind,
    token: &SecretString,
) -> std::result::Result<Vec<CatalogEntry>, ApiError> {
    Ok(match kind {
        CatalogKind::Product => backend
            .products(Some(token))
            .await?
            .into_iter()
            .map(CatalogEntry::Product)
            .collect(),
        CatalogKind::Service => backend
            .services(Some(token))
            .await?
            .into_iter()
            .map(CatalogEntry::Service)
            .collect(),
    })
}

async fn persist(
    backend: &BackendClient,
    token: &SecretString,
    id: Option<i64>,
    submission: &CatalogSubmission,
) -> std::result::Result<(), ApiError> {
    match (submission.kind, id) {
        (CatalogKind::Product, None) => backend.create_product(token, submission).await,
        (CatalogKind::Product, Some(id)) => {
            backend
                .update_product(token, ProductId::new(id), submission)
                .await
        }
        (CatalogKind::Service, None) => backend.create_service(token, submission).await,
        (CatalogKind::Service, Some(id)) => {
            backend
                .update_service(token, ServiceId::new(id), submission)
                .await
        }
    }
}

async fn remove(
    backend: &BackendClient,
    kind: CatalogKind,
    token: &SecretString,
    id: i64,
) -> std::result::Result<(), ApiError> {
    match kind {
        CatalogKind::Product => backend.delete_product(token, ProductId::new(id)).await,
        CatalogKind::Service => backend.delete_service(token, ServiceId::new(id)).await,
    }
}

/// Categories for the selector, or an empty list after logging the failure.
async fn load_categories(
    backend: &BackendClient,
    token: &SecretString,
) -> std::result::Result<Vec<Category>, ApiError> {
    match backend.categories(Some(token)).await {
        Err(e) if !e.is_unauthorized() => {
            tracing::error!("Failed to fetch categories: {e}");
            Ok(Vec::new())
        }
        result => result,
    }
}

/// A row of the list view.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
    pub rating: RatingView,
}

/// List template.
#[derive(Template)]
#[template(path = "admin/catalog_list.html")]
pub struct CatalogListTemplate {
    pub layout: AdminLayout,
    pub heading: &'static str,
    pub noun: &'static str,
    pub base: &'static str,
    pub rows: Vec<CatalogRow>,
    pub load_error: Option<LoadError>,
    pub flash: Flash,
}

/// A `<select>` option of the category selector.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One star of the rating input.
#[derive(Debug, Clone)]
pub struct StarChoice {
    pub value: u8,
    pub checked: bool,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "admin/catalog_form.html")]
pub struct CatalogFormTemplate {
    pub layout: AdminLayout,
    pub heading: String,
    pub title_label: &'static str,
    pub action: String,
    pub cancel: &'static str,
    pub form: CatalogForm,
    pub categories: Vec<CategoryOption>,
    pub requires_category: bool,
    pub image_preview: Option<String>,
    pub rating: RatingChoices,
    pub error: Option<String>,
}

fn category_options(categories: &[Category], selected: &str) -> Vec<CategoryOption> {
    let choices: Vec<(CategoryRef, String)> = if categories.is_empty() {
        DEFAULT_CATEGORIES
            .iter()
            .map(|name| (CategoryRef::Unresolved((*name).to_string()), (*name).to_string()))
            .collect()
    } else {
        categories
            .iter()
            .map(|c| (CategoryRef::Known(c.id), c.name.clone()))
            .collect()
    };
    let current = CategoryRef::from_form(selected);
    let mut options: Vec<CategoryOption> = choices
        .into_iter()
        .map(|(category, label)| CategoryOption {
            selected: category == current,
            value: category.form_value(),
            label,
        })
        .collect();

    // A name that is no longer listed stays selectable so an edit keeps it.
    if let CategoryRef::Unresolved(name) = &current
        && !options.iter().any(|o| o.selected)
    {
        options.push(CategoryOption {
            value: current.form_value(),
            label: format!("{name} (not listed)"),
            selected: true,
        });
    }
    options
}

/// Rating input: whole stars, plus the stored value when it is not a whole
/// star so that saving without touching the stars keeps it.
#[derive(Debug, Clone)]
pub struct RatingChoices {
    pub stars: Vec<StarChoice>,
    pub kept: Option<String>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn star_choices(rating: Option<&str>) -> RatingChoices {
    let stored = rating
        .map(str::trim)
        .and_then(|r| r.parse::<f64>().ok().map(|value| (r, value)))
        .filter(|(_, value)| (0.0..=f64::from(MAX_STARS)).contains(value));
    let whole = stored
        .filter(|(_, value)| value.fract().abs() < f64::EPSILON)
        .map_or(0, |(_, value)| value as u8);
    let kept = stored
        .filter(|(_, value)| value.fract().abs() >= f64::EPSILON)
        .map(|(raw, _)| raw.to_string());
    RatingChoices {
        stars: (1..=MAX_STARS)
            .map(|value| StarChoice {
                value,
                checked: value == whole,
            })
            .collect(),
        kept,
    }
}

fn form_page(
    state: &AppState,
    admin: &CurrentAdmin,
    kind: CatalogKind,
    id: Option<i64>,
    form: CatalogForm,
    categories: &[Category],
    error: Option<String>,
) -> Response {
    let base = base_path(kind);
    let (heading, action) = match id {
        Some(id) => (format!("Edit {}", capitalized(kind)), format!("{base}/{id}")),
        None => (format!("Add New {}", capitalized(kind)), base.to_string()),
    };
    let image = form.image.trim();
    let image_preview =
        (!image.is_empty()).then(|| resolve_image_url(image, state.backend().base_url()));

    render(&CatalogFormTemplate {
        layout: AdminLayout::new(state, admin, base),
        heading,
        title_label: match kind {
            CatalogKind::Product => "Name",
            CatalogKind::Service => "Title",
        },
        action,
        cancel: base,
        categories: category_options(categories, &form.category),
        requires_category: kind.requires_category(),
        image_preview,
        rating: star_choices(form.rating.as_deref()),
        form,
        error,
    })
}

/// Create the router for one catalog kind.
pub fn routes(kind: CatalogKind) -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/new", get(new_form))
        .route("/{id}/edit", get(edit_form))
        .route("/{id}", axum::routing::post(update))
        .route("/{id}/delete", get(confirm_delete).post(delete))
        .layer(Extension(kind))
}

/// List page.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
    Query(flash): Query<Flash>,
) -> Response {
    let backend = state.backend();
    let (entries, categories) = tokio::join!(
        fetch_entries(backend, kind, &admin.token),
        backend.categories(Some(&admin.token)),
    );
    let index = match &categories {
        Ok(categories) => CategoryIndex::new(categories),
        Err(e) => {
            tracing::error!("Failed to fetch categories: {e}");
            CategoryIndex::default()
        }
    };

    let api = backend.base_url();
    let (rows, load_error) = match &entries {
        Ok(entries) => (
            entries
                .iter()
                .map(|entry| {
                    let (category, description, image, rating) = entry.parts();
                    CatalogRow {
                        id: entry.id(),
                        title: entry.title().to_string(),
                        category: index.display(&index.resolve(category)),
                        description: description.to_string(),
                        image_url: (!image.trim().is_empty())
                            .then(|| resolve_image_url(image, api)),
                        rating: RatingView::new(rating),
                    }
                })
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch {}s: {e}", kind.noun());
            (Vec::new(), Some(LoadError::new(e)))
        }
    };

    let template = CatalogListTemplate {
        layout: AdminLayout::new(&state, &admin, base_path(kind)),
        heading: match kind {
            CatalogKind::Product => "Products",
            CatalogKind::Service => "Services",
        },
        noun: capitalized(kind),
        base: base_path(kind),
        rows,
        load_error,
        flash,
    };
    render_after(
        &template,
        &[entries.as_ref().err(), categories.as_ref().err()],
    )
}

/// Empty create form.
#[instrument(skip(state, admin))]
pub async fn new_form(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
) -> Result<Response> {
    let categories = load_categories(state.backend(), &admin.token).await?;
    Ok(form_page(
        &state,
        &admin,
        kind,
        None,
        CatalogForm::default(),
        &categories,
        None,
    ))
}

async fn find_entry(
    state: &AppState,
    admin: &CurrentAdmin,
    kind: CatalogKind,
    id: i64,
) -> Result<Option<CatalogEntry>> {
    let entries = fetch_entries(state.backend(), kind, &admin.token).await?;
    Ok(entries.into_iter().find(|entry| entry.id() == id))
}

fn not_found(kind: CatalogKind) -> Response {
    let flash = Flash::error(format!("{} not found", capitalized(kind)));
    Redirect::to(&flash.redirect_url(base_path(kind))).into_response()
}

/// Prefilled edit form.
#[instrument(skip(state, admin))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let Some(entry) = find_entry(&state, &admin, kind, id).await? else {
        return Ok(not_found(kind));
    };
    let categories = load_categories(state.backend(), &admin.token).await?;
    let form = entry.to_form(&CategoryIndex::new(&categories));
    Ok(form_page(&state, &admin, kind, Some(id), form, &categories, None))
}

/// Validate, upload the image and persist.
async fn save(
    state: &AppState,
    admin: &CurrentAdmin,
    kind: CatalogKind,
    id: Option<i64>,
    multipart: Multipart,
) -> Result<Response> {
    let backend = state.backend();
    let mut submitted = SubmittedForm::read(multipart).await?;
    let uploaded = submitted
        .upload_images(backend, &admin.token, kind.upload_type())
        .await;
    let form = CatalogForm {
        title: submitted.text("title"),
        category: submitted.text("category"),
        description: submitted.text("description"),
        image: submitted.text("image"),
        rating: submitted.get("rating").map(ToString::to_string),
    };
    let categories = load_categories(backend, &admin.token).await?;

    if let Err(failure) = uploaded {
        if failure.unauthorized {
            return Err(AppError::Backend(ApiError::Unauthorized));
        }
        return Ok(form_page(
            state,
            admin,
            kind,
            id,
            form,
            &categories,
            Some(failure.message),
        ));
    }

    let submission = match form.validate(kind, &CategoryIndex::new(&categories)) {
        Ok(submission) => submission,
        Err(e) => {
            return Ok(form_page(
                state,
                admin,
                kind,
                id,
                form,
                &categories,
                Some(e.to_string()),
            ));
        }
    };

    match persist(backend, &admin.token, id, &submission).await {
        Ok(()) => {
            add_breadcrumb(
                "catalog",
                &format!("Saved {}", kind.noun()),
                Some(&[("title", submission.title.as_str())]),
            );
            tracing::info!(kind = kind.noun(), title = %submission.title, "Catalog entry saved");
            let flash = Flash::success(format!("{} saved successfully", capitalized(kind)));
            Ok(Redirect::to(&flash.redirect_url(base_path(kind))).into_response())
        }
        Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!("Failed to save {}: {e}", kind.noun());
            let message = e.message_or(&format!("Failed to save {}", kind.noun()));
            Ok(form_page(
                state,
                admin,
                kind,
                id,
                form,
                &categories,
                Some(message),
            ))
        }
    }
}

/// Create an entry.
#[instrument(skip(state, admin, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
    multipart: Multipart,
) -> Result<Response> {
    save(&state, &admin, kind, None, multipart).await
}

/// Update an entry.
#[instrument(skip(state, admin, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Response> {
    save(&state, &admin, kind, Some(id), multipart).await
}

/// Ask before deleting.
#[instrument(skip(state, admin))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let Some(entry) = find_entry(&state, &admin, kind, id).await? else {
        return Ok(not_found(kind));
    };
    let base = base_path(kind);
    Ok(render(&ConfirmDeleteTemplate {
        layout: AdminLayout::new(&state, &admin, base),
        heading: format!("Delete {}", capitalized(kind)),
        question: format!("Are you sure you want to delete this {}?", kind.noun()),
        note: Some(entry.title().to_string()),
        action: format!("{base}/{id}/delete"),
        cancel: base.to_string(),
    }))
}

/// Delete an entry once confirmed.
#[instrument(skip(state, admin, form))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Extension(kind): Extension<CatalogKind>,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let base = base_path(kind);
    if !form.confirmed() {
        return Ok(Redirect::to(&format!("{base}/{id}/delete")).into_response());
    }

    let flash = match remove(state.backend(), kind, &admin.token, id).await {
        Ok(()) => {
            add_breadcrumb("catalog", &format!("Deleted {}", kind.noun()), None);
            tracing::info!(kind = kind.noun(), id, "Catalog entry deleted");
            Flash::success(format!("{} deleted successfully", capitalized(kind)))
        }
        Err(e) if e.is_unauthorized() => return Err(AppError::Backend(e)),
        Err(e) => {
            tracing::error!("Failed to delete {}: {e}", kind.noun());
            Flash::error(format!("Failed to delete {}", kind.noun()))
        }
    };
    Ok(Redirect::to(&flash.redirect_url(base)).into_response())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use reshow_core::CategoryId;

    fn drinkware() -> Vec<Category> {
        vec![Category {
            id: CategoryId::new(9),
            name: "Drinkware".to_string(),
            created_at: None,
        }]
    }

    #[test]
    fn test_category_options_fall_back_to_defaults() {
        let options = category_options(&[], "name:Headwear");
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].value, "name:Apparel");
        assert!(options[1].selected);
    }

    #[test]
    fn test_category_options_use_ids() {
        let options = category_options(&drinkware(), "id:9");
        assert_eq!(options[0].value, "id:9");
        assert_eq!(options[0].label, "Drinkware");
        assert!(options[0].selected);
    }

    #[test]
    fn test_unlisted_category_is_offered_and_selected() {
        let options = category_options(&drinkware(), "name:Old Name");
        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert_eq!(options[1].value, "name:Old Name");
        assert!(options[1].selected);
    }

    #[test]
    fn test_unassigned_selects_nothing() {
        let options = category_options(&drinkware(), "");
        assert_eq!(options.len(), 1);
        assert!(options.iter().all(|o| !o.selected));
    }

    fn checked(rating: Option<&str>) -> Vec<u8> {
        star_choices(rating)
            .stars
            .iter()
            .filter(|s| s.checked)
            .map(|s| s.value)
            .collect()
    }

    #[test]
    fn test_star_choices_are_whole_stars() {
        assert_eq!(checked(Some("4")), vec![4]);
        assert_eq!(checked(Some("0")), Vec::<u8>::new());
        assert_eq!(checked(None), Vec::<u8>::new());
        assert_eq!(checked(Some("9")), Vec::<u8>::new());
        assert_eq!(star_choices(Some("4")).kept, None);
    }

    #[test]
    fn test_fractional_rating_is_kept() {
        assert_eq!(checked(Some("3.5")), Vec::<u8>::new());
        assert_eq!(star_choices(Some("3.5")).kept.as_deref(), Some("3.5"));
        assert_eq!(star_choices(Some("3.4")).kept.as_deref(), Some("3.4"));
        assert_eq!(star_choices(Some("7.5")).kept, None);
    }
}
