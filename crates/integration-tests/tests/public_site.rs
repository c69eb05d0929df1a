//! End-to-end tests for the public pages.
//!
//! Each test serves the site against its own mock backend.

#![allow(clippy::indexing_slicing)]

use reqwest::{Method, StatusCode};
use reshow_integration_tests::{TestSite, browser, location, text};
use serde_json::json;

// =============================================================================
// Contact form
// =============================================================================

const CONTACT_FIELDS: &[(&str, &str)] = &[
    ("name", "Tendai Mhlanga"),
    ("email", "tendai@example.co.zw"),
    ("phone", "+263 77 123 4567"),
    ("subject", "Branded caps"),
    ("message", "We need 200 caps for a conference."),
];

#[tokio::test]
async fn test_contact_message_is_sent() {
    let site = TestSite::start().await;

    let response = site.post_form("/contact", CONTACT_FIELDS).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Message sent successfully!"));
    // The form is emptied after a successful send.
    assert!(!body.contains("Tendai Mhlanga"));

    let calls = site.backend.calls_to(&Method::POST, "/contact");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["name"], json!("Tendai Mhlanga"));
    assert_eq!(calls[0].body["subject"], json!("Branded caps"));
    assert_eq!(calls[0].authorization, None);
}

#[tokio::test]
async fn test_contact_failure_keeps_what_was_typed() {
    let site = TestSite::start().await;
    site.backend.respond(
        Method::POST,
        "/contact",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Mail relay down" }),
    );

    let body = text(site.post_form("/contact", CONTACT_FIELDS).await).await;
    assert!(body.contains("Failed to send message. Please try again."));
    assert!(body.contains("Tendai Mhlanga"));
    assert!(!body.contains("Message sent successfully!"));
}

// =============================================================================
// Rendering with backend failures
// =============================================================================

#[tokio::test]
async fn test_home_falls_back_to_defaults() {
    let site = TestSite::start().await;
    site.backend.respond(
        Method::GET,
        "/content/hero",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({}),
    );

    let response = site.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Reshow Investments"));
}

#[tokio::test]
async fn test_saved_content_overrides_defaults() {
    let site = TestSite::start().await;
    site.backend.respond(
        Method::GET,
        "/content/hero",
        StatusCode::OK,
        json!({ "title": "Branding That Lasts" }),
    );

    let body = text(site.get("/").await).await;
    assert!(body.contains("Branding That Lasts"));
}

#[tokio::test]
async fn test_unknown_path_redirects_home() {
    let site = TestSite::start().await;

    let response = site.get("/no-such-page").await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

// =============================================================================
// Visitor tracking
// =============================================================================

#[tokio::test]
async fn test_visitor_is_tracked_once_per_session() {
    let site = TestSite::start().await;

    for path in ["/", "/about", "/gallery", "/"] {
        assert_eq!(site.get(path).await.status(), StatusCode::OK);
    }
    let calls = site.backend.wait_for(&Method::POST, "/visitors/track", 1).await;
    assert_eq!(calls.len(), 1);

    // A second browser is a second visitor.
    let other = browser();
    let response = other
        .get(site.url("/contact"))
        .send()
        .await
        .expect("GET failed");
    assert_eq!(response.status(), StatusCode::OK);
    let calls = site.backend.wait_for(&Method::POST, "/visitors/track", 2).await;
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn test_admin_pages_are_not_counted_as_visits() {
    let site = TestSite::start().await;

    let _ = site.get("/admin/login").await;
    let calls = site.backend.wait_for(&Method::POST, "/visitors/track", 1).await;
    assert!(calls.is_empty());
}

// =============================================================================
// Quote cart
// =============================================================================

#[tokio::test]
async fn test_empty_cart_cannot_be_submitted() {
    let site = TestSite::start().await;

    let _ = site
        .post_form(
            "/services/quote",
            &[
                ("nameOrCompany", "Mhlanga Holdings"),
                ("email", "tendai@example.co.zw"),
                ("phone", ""),
            ],
        )
        .await;
    assert!(site.backend.calls_to(&Method::POST, "/quotes").is_empty());
}

#[tokio::test]
async fn test_quote_request_carries_the_cart() {
    let site = TestSite::start().await;
    site.backend.respond(
        Method::GET,
        "/products",
        StatusCode::OK,
        json!([{ "id": 7, "name": "Branded Caps", "category": "Caps", "rating": 4.5 }]),
    );

    let added = site.post_form("/services/cart/add", &[("product_id", "7")]).await;
    assert!(added.status().is_redirection());
    let _ = site
        .post_form("/services/cart/update", &[("product_id", "7"), ("quantity", "50")])
        .await;

    let requester = [
        ("nameOrCompany", "Mhlanga Holdings"),
        ("email", "tendai@example.co.zw"),
        ("phone", "+263 77 123 4567"),
    ];
    let response = site.post_form("/services/quote", &requester).await;
    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/services?success="));

    let calls = site.backend.calls_to(&Method::POST, "/quotes");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["company"], json!("Mhlanga Holdings"));
    assert_eq!(
        calls[0].body["products"],
        json!([{ "productId": 7, "productName": "Branded Caps", "quantity": 50 }])
    );

    // The cart was emptied by the successful submission.
    let _ = site.post_form("/services/quote", &requester).await;
    assert_eq!(site.backend.calls_to(&Method::POST, "/quotes").len(), 1);
}
