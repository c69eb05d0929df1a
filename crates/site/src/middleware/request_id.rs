//! Request ID middleware for request tracing and correlation.
//!
//! Generates a UUID v4 for each request unless an upstream proxy supplied a
//! usable one. The request ID is:
//! - Recorded in the current tracing span
//! - Added to the Sentry scope for error correlation
//! - Returned in the response headers

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Accept an upstream ID only if it is short and plain.
fn accept_upstream(value: &str) -> Option<&str> {
    let plain = value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    (!value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN && plain).then_some(value)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(accept_upstream)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_proxy_ids() {
        assert_eq!(accept_upstream("abc-123_x.y"), Some("abc-123_x.y"));
        assert_eq!(
            accept_upstream("8f2c1e4a-0b6d-4a1e-9c3f-2d5e7b9a1c0d"),
            Some("8f2c1e4a-0b6d-4a1e-9c3f-2d5e7b9a1c0d")
        );
    }

    #[test]
    fn test_rejects_unusable_ids() {
        assert_eq!(accept_upstream(""), None);
        assert_eq!(accept_upstream("has space"), None);
        assert_eq!(accept_upstream("<script>"), None);
        assert_eq!(accept_upstream(&"a".repeat(MAX_REQUEST_ID_LEN + 1)), None);
    }
}
