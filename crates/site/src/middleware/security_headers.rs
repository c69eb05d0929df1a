//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Uploaded images are
//! served by the backend, so its origin is the one addition to `img-src`.
//! Quote replies open WhatsApp, so `form-action` allows `https://wa.me`.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use reshow_core::api_url::api_origin;

use crate::state::AppState;

/// Build the content security policy for a backend at `api_base_url`.
#[must_use]
pub fn content_security_policy(api_base_url: &str) -> String {
    let origin = api_origin(api_base_url.trim());
    let img_src = if origin.is_empty() {
        "'self' data:".to_owned()
    } else {
        format!("'self' data: {origin}")
    };
    format!(
        "default-src 'none'; \
         script-src 'self'; \
         style-src 'self'; \
         font-src 'self'; \
         img-src {img_src}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self' https://wa.me; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying sensitive features
/// - `Cache-Control: no-store, max-age=0` outside `/static`
/// - `Cross-Origin-Opener-Policy: same-origin`
/// - `Cross-Origin-Resource-Policy: same-origin`
/// - `Cross-Origin-Embedder-Policy: credentialless`
/// - `X-DNS-Prefetch-Control: off`
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let is_static = request.uri().path().starts_with("/static/");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    let csp = content_security_policy(&state.config().api.base_url);
    match HeaderValue::from_str(&csp) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!("Invalid content security policy: {e}"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             autoplay=(), \
             camera=(), \
             display-capture=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             payment=(), \
             usb=()",
        ),
    );

    if !is_static {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
    // Backend images carry no CORP header.
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}
