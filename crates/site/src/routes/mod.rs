//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About page
//! GET  /services               - Products and services with the quote cart
//! POST /services/cart/add      - Add a product to the quote cart
//! POST /services/cart/update   - Change a quantity
//! POST /services/cart/remove   - Remove a product
//! POST /services/cart/clear    - Empty the cart
//! POST /services/quote         - Submit the quote request
//! POST /services/products/{id}/rate - Rate a product
//! POST /services/items/{id}/rate    - Rate a service
//! GET  /gallery                - Gallery
//! GET  /contact                - Contact form
//! POST /contact                - Send the contact form
//!
//! # Admin (see `admin`)
//! /admin/...
//! ```
//!
//! Unknown paths redirect to the home page.

pub mod about;
pub mod admin;
pub mod contact;
pub mod gallery;
pub mod home;
pub mod services;
pub mod views;

use axum::{
    Router,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use reshow_core::content::{SectionContent, SectionId, defaults::hardcoded};

use crate::backend::ApiError;
use crate::error::BackendUnauthorized;
use crate::state::AppState;

pub use views::Flash;

/// Collects fallbacks taken while rendering one page.
///
/// Public pages never fail because a backend read failed: the read is
/// logged and replaced by defaults. A 401 among them still marks the
/// response so stale credentials get cleared.
#[derive(Debug, Default)]
pub struct Fallbacks {
    unauthorized: bool,
}

impl Fallbacks {
    /// The value of `result`, or `fallback()` after logging the failure.
    pub fn take<T>(
        &mut self,
        what: &str,
        result: Result<T, ApiError>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to fetch {what}: {e}");
                self.unauthorized |= e.is_unauthorized();
                fallback()
            }
        }
    }

    /// Effective content of a section, or its defaults.
    pub fn section(
        &mut self,
        id: SectionId,
        result: Result<SectionContent, ApiError>,
    ) -> SectionContent {
        self.take(id.as_str(), result, || hardcoded(id))
    }

    /// Turn the rendered page into a response, marked when a read hit a 401.
    pub fn respond(self, page: impl IntoResponse) -> Response {
        let mut response = page.into_response();
        if self.unauthorized {
            response.extensions_mut().insert(BackendUnauthorized);
        }
        response
    }
}

async fn fallback(uri: Uri) -> Redirect {
    tracing::debug!(path = %uri.path(), "Unknown path, redirecting home");
    Redirect::to("/")
}

/// Create the services routes router.
pub fn services_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::index))
        .route("/cart/add", post(services::cart_add))
        .route("/cart/update", post(services::cart_update))
        .route("/cart/remove", post(services::cart_remove))
        .route("/cart/clear", post(services::cart_clear))
        .route("/quote", post(services::submit_quote))
        .route("/products/{id}/rate", post(services::rate_product))
        .route("/items/{id}/rate", post(services::rate_service))
}

/// Create all routes for the site.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(about::about))
        .nest("/services", services_routes())
        .route("/gallery", get(gallery::gallery))
        .route("/contact", get(contact::show).post(contact::send))
        .nest("/admin", admin::routes(state))
        .fallback(fallback)
}
