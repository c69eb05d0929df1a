//! Visitor counting.
//!
//! The first public page a browser session loads is reported to the
//! backend once. The report runs in the background and never affects the
//! page.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;
use tracing::debug;

use super::session::keys;
use crate::state::AppState;

/// Public pages that count as a visit.
pub const TRACKED_PATHS: [&str; 5] = ["/", "/about", "/services", "/gallery", "/contact"];

fn is_tracked(method: &Method, path: &str) -> bool {
    method == Method::GET && TRACKED_PATHS.contains(&path)
}

/// Report one visit per browser session.
pub async fn visitor_tracking_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_tracked(request.method(), request.uri().path())
        && let Some(session) = request.extensions().get::<Session>()
    {
        let tracked = session
            .get::<bool>(keys::VISITOR_TRACKED)
            .await
            .ok()
            .flatten()
            .unwrap_or(false);
        if !tracked {
            match session.insert(keys::VISITOR_TRACKED, true).await {
                Ok(()) => {
                    let backend = state.backend().clone();
                    tokio::spawn(async move {
                        if let Err(e) = backend.track_visit().await {
                            debug!("Visitor tracking failed: {e}");
                        }
                    });
                }
                Err(e) => debug!("Failed to mark visitor as tracked: {e}"),
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_public_gets_are_tracked() {
        assert!(is_tracked(&Method::GET, "/"));
        assert!(is_tracked(&Method::GET, "/gallery"));
        assert!(!is_tracked(&Method::POST, "/contact"));
        assert!(!is_tracked(&Method::GET, "/admin"));
        assert!(!is_tracked(&Method::GET, "/static/css/site.css"));
    }
}
