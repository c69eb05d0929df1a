//! End-to-end tests for admin login, the forced password change, idle
//! logout and the reaction to a rejected token.

#![allow(clippy::indexing_slicing)]

use reqwest::{Method, StatusCode};
use reshow_core::auth::IDLE_NOTICE;
use reshow_integration_tests::{
    NEW_USER_EMAIL, PASSWORD, STAFF_EMAIL, SUPERADMIN_EMAIL, TestSite, location, text,
};
use serde_json::json;

const STRONG_PASSWORD: &str = "Branding@2025";

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_admin_pages_require_login() {
    let site = TestSite::start().await;

    let response = site.get("/admin/dashboard").await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/admin/login");
    assert!(site.backend.calls_under(&Method::GET, "/admin").is_empty());
}

#[tokio::test]
async fn test_rejected_login_stays_on_the_form() {
    let site = TestSite::start().await;

    let response = site
        .post_form(
            "/admin/login",
            &[("email", SUPERADMIN_EMAIL), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Login failed"));
    assert!(body.contains(SUPERADMIN_EMAIL));

    let response = site.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_login_opens_the_dashboard() {
    let site = TestSite::start().await;

    assert_eq!(site.login(SUPERADMIN_EMAIL, PASSWORD).await, "/admin/dashboard");

    let response = site.get("/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Rudo Moyo"));
    assert!(body.contains("120"));

    let calls = site.backend.calls_to(&Method::GET, "/admin/dashboard");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some("Bearer token-superadmin")
    );
}

#[tokio::test]
async fn test_login_page_skips_to_dashboard_when_logged_in() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;

    let response = site.get("/admin/login").await;
    assert_eq!(location(&response), "/admin/dashboard");
}

// =============================================================================
// Forced password change
// =============================================================================

#[tokio::test]
async fn test_forced_password_change() {
    let site = TestSite::start().await;

    assert_eq!(
        site.login(NEW_USER_EMAIL, PASSWORD).await,
        "/admin/change-password"
    );

    // Nothing else is reachable until the password is changed.
    let response = site.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin/change-password");

    let response = site
        .post_form(
            "/admin/change-password",
            &[
                ("current_password", PASSWORD),
                ("new_password", STRONG_PASSWORD),
                ("confirm_password", "Branding@2026"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("New passwords do not match"));

    let response = site
        .post_form(
            "/admin/change-password",
            &[
                ("current_password", PASSWORD),
                ("new_password", "weak"),
                ("confirm_password", "weak"),
            ],
        )
        .await;
    assert!(text(response).await.contains("Password must be at least 8 characters"));

    // `#` is outside the allowed symbol set.
    let response = site
        .post_form(
            "/admin/change-password",
            &[
                ("current_password", PASSWORD),
                ("new_password", "Branding#2025"),
                ("confirm_password", "Branding#2025"),
            ],
        )
        .await;
    assert!(text(response).await.contains("Password must be at least 8 characters"));
    assert!(
        site.backend
            .calls_to(&Method::POST, "/auth/change-password")
            .is_empty()
    );

    let response = site
        .post_form(
            "/admin/change-password",
            &[
                ("current_password", PASSWORD),
                ("new_password", STRONG_PASSWORD),
                ("confirm_password", STRONG_PASSWORD),
            ],
        )
        .await;
    assert_eq!(location(&response), "/admin/dashboard");

    let calls = site.backend.calls_to(&Method::POST, "/auth/change-password");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].body,
        json!({
            "userId": 2,
            "currentPassword": PASSWORD,
            "newPassword": STRONG_PASSWORD,
        })
    );

    let response = site.get("/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_page_needs_a_pending_change() {
    let site = TestSite::start().await;

    let response = site.get("/admin/change-password").await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_failed_login_drops_a_pending_change() {
    let site = TestSite::start().await;

    assert_eq!(
        site.login(NEW_USER_EMAIL, PASSWORD).await,
        "/admin/change-password"
    );
    let response = site
        .post_form(
            "/admin/login",
            &[("email", NEW_USER_EMAIL), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = site.get("/admin/change-password").await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_new_login_replaces_the_session() {
    let site = TestSite::start().await;

    assert_eq!(site.login(STAFF_EMAIL, PASSWORD).await, "/admin/dashboard");
    assert_eq!(
        site.login(SUPERADMIN_EMAIL, PASSWORD).await,
        "/admin/dashboard"
    );

    let response = site.get("/admin/users").await;
    assert_eq!(response.status(), StatusCode::OK);
    let auth = site.backend.calls_to(&Method::GET, "/admin/users");
    assert_eq!(
        auth[0].authorization.as_deref(),
        Some("Bearer token-superadmin")
    );
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_clears_the_session() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;

    let response = site.post_form("/admin/logout", &[]).await;
    assert_eq!(location(&response), "/admin/login");

    let response = site.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn test_idle_logout_explains_itself() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;

    let response = site.get("/admin/logout?reason=idle").await;
    assert_eq!(location(&response), "/admin/login?reason=idle");

    let body = text(site.get("/admin/login?reason=idle").await).await;
    assert!(body.contains(IDLE_NOTICE));
}

#[tokio::test]
async fn test_activity_ping_keeps_session_alive() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;

    let response = site.post_form("/admin/activity", &[]).await;
    assert!(response.status().is_success());
}

// =============================================================================
// Rejected tokens
// =============================================================================

#[tokio::test]
async fn test_rejected_token_on_admin_page_returns_to_login() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;
    site.backend.respond(
        Method::GET,
        "/admin/dashboard",
        StatusCode::UNAUTHORIZED,
        json!({ "error": "Token expired" }),
    );

    let response = site.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin/login");

    // The credentials are gone, not just this page.
    let response = site.get("/admin/categories").await;
    assert_eq!(location(&response), "/admin/login");
    assert!(site.backend.calls_to(&Method::GET, "/categories").is_empty());
}

#[tokio::test]
async fn test_rejected_token_on_public_page_still_renders() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;
    site.backend.respond(
        Method::GET,
        "/content/hero",
        StatusCode::UNAUTHORIZED,
        json!({ "error": "Token expired" }),
    );

    let response = site.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Reshow Investments"));

    let response = site.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin/login");
}

// =============================================================================
// Roles
// =============================================================================

#[tokio::test]
async fn test_user_management_is_for_superadmins() {
    let site = TestSite::start().await;
    site.login(STAFF_EMAIL, PASSWORD).await;

    let response = site.get("/admin/users").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(site.backend.calls_to(&Method::GET, "/admin/users").is_empty());
}

#[tokio::test]
async fn test_superadmin_creates_user() {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;

    let response = site
        .post_form(
            "/admin/users",
            &[("fullName", "Nyasha Banda"), ("email", "nyasha@reshow.co.zw")],
        )
        .await;
    assert!(location(&response).starts_with("/admin/users?success="));

    let calls = site.backend.calls_to(&Method::POST, "/admin/users");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].body,
        json!({ "fullName": "Nyasha Banda", "email": "nyasha@reshow.co.zw" })
    );
}
