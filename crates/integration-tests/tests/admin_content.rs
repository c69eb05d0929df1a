//! End-to-end tests for the section content editor.

#![allow(clippy::indexing_slicing)]

use reqwest::{Method, StatusCode};
use reshow_integration_tests::{PASSWORD, SUPERADMIN_EMAIL, TestSite, location, text};
use serde_json::json;

async fn logged_in() -> TestSite {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;
    site
}

#[tokio::test]
async fn test_editor_shows_defaults_for_unsaved_sections() {
    let site = logged_in().await;

    let response = site.get("/admin/content?section=hero").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Reshow Investments"));
}

#[tokio::test]
async fn test_save_one_section() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/content/hero",
            &[("action", "save"), ("f.title", "Branding That Lasts")],
        )
        .await;
    assert!(location(&response).contains("success="));

    let calls = site.backend.calls_to(&Method::PUT, "/admin/content/hero");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["title"], json!("Branding That Lasts"));
    assert!(site.backend.calls_to(&Method::PUT, "/about").is_empty());
}

#[tokio::test]
async fn test_about_sections_save_the_about_document() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/content/mission",
            &[("action", "save"), ("f.title", "Our Mission")],
        )
        .await;
    assert!(location(&response).contains("success="));

    let calls = site.backend.calls_to(&Method::PUT, "/about");
    assert_eq!(calls.len(), 1);
    assert!(site.backend.calls_under(&Method::PUT, "/admin/content").is_empty());
}

#[tokio::test]
async fn test_save_all_writes_every_section() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/content/hero",
            &[("action", "save_all"), ("f.title", "Branding That Lasts")],
        )
        .await;
    assert!(location(&response).contains("success="));

    let hero = site.backend.calls_to(&Method::PUT, "/admin/content/hero");
    assert_eq!(hero.len(), 1);
    assert_eq!(hero[0].body["title"], json!("Branding That Lasts"));
    assert_eq!(
        site.backend.calls_to(&Method::PUT, "/admin/content/footer").len(),
        1
    );
    assert_eq!(
        site.backend.calls_to(&Method::PUT, "/admin/content/navbar").len(),
        1
    );
    assert_eq!(site.backend.calls_to(&Method::PUT, "/about").len(), 1);
    // About sections travel in the about document only.
    assert!(
        site.backend
            .calls_to(&Method::PUT, "/admin/content/mission")
            .is_empty()
    );
}

#[tokio::test]
async fn test_save_all_reports_failed_sections() {
    let site = logged_in().await;
    site.backend.respond(
        Method::PUT,
        "/admin/content/footer",
        StatusCode::BAD_REQUEST,
        json!({ "error": "Footer text too long" }),
    );

    let response = site
        .post_multipart(
            "/admin/content/hero",
            &[("action", "save_all"), ("f.title", "Branding That Lasts")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Failed to save content"));
    assert!(body.contains("Footer text too long"));
    // The draft survives the failure.
    assert!(body.contains("Branding That Lasts"));
    // The other sections were still written.
    assert_eq!(
        site.backend.calls_to(&Method::PUT, "/admin/content/navbar").len(),
        1
    );
}

#[tokio::test]
async fn test_editor_actions_without_save_send_nothing() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/content/whyChoose",
            &[("action", "add_item"), ("f.title", "Why Us")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Why Us"));
    assert!(site.backend.calls_under(&Method::PUT, "/").is_empty());
}

#[tokio::test]
async fn test_unknown_section_is_not_found() {
    let site = logged_in().await;

    let response = site
        .post_multipart("/admin/content/sidebar", &[("action", "save")])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_all_keeps_draft_when_content_cannot_be_loaded() {
    let site = logged_in().await;
    site.backend.respond(
        Method::GET,
        "/admin/content",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({}),
    );

    let response = site
        .post_multipart(
            "/admin/content/hero",
            &[("action", "save_all"), ("f.title", "Branding That Lasts")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Failed to save content"));
    assert!(body.contains("Branding That Lasts"));
    assert!(site.backend.calls_under(&Method::PUT, "/").is_empty());
}
