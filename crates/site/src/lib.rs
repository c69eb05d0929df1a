//! Reshow Investments site library.
//!
//! Public marketing pages and the content admin, rendered server-side over
//! the company's backend API. Built as a library so the router can be
//! exercised by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state, routing::get};
use tower_http::services::ServeDir;

use middleware::session::SessionKeyError;
use state::AppState;

/// Directory of stylesheets, scripts and bundled images.
pub const STATIC_DIR: &str = "crates/site/static";

/// Build the application router with its middleware stack.
///
/// Observability layers (tracing, Sentry) are added by the binary.
///
/// # Errors
///
/// Returns an error if the session signing key cannot be derived.
pub fn app(state: AppState) -> Result<Router, SessionKeyError> {
    let session_layer = middleware::create_session_layer(state.config())?;

    Ok(Router::new()
        .route("/health", get(health))
        .merge(routes::routes(&state))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .nest_service("/images", ServeDir::new(format!("{STATIC_DIR}/images")))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_headers_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::visitor_tracking_middleware,
        ))
        .layer(from_fn(middleware::unauthorized_middleware))
        .layer(session_layer)
        .layer(from_fn(middleware::request_id_middleware))
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
