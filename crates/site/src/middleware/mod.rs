//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with an in-memory store)
//! 5. Unauthorized (clear credentials after a backend 401)
//! 6. Visitor (count one visit per browser session)
//! 7. Security headers (CSP, frame and isolation headers)
//!
//! Protected admin routes additionally run [`admin_session_middleware`] as
//! a route layer.

pub mod admin_session;
pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod unauthorized;
pub mod visitor;

pub use admin_session::{AdminSession, admin_session_middleware};
pub use auth::{CurrentAdmin, RequireAdminAuth, RequireSuperAdmin};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use unauthorized::unauthorized_middleware;
pub use visitor::visitor_tracking_middleware;
