//! End-to-end tests for the catalog, category management and the quote inbox.

#![allow(clippy::indexing_slicing)]

use reqwest::{Method, StatusCode};
use reshow_integration_tests::{
    PASSWORD, SUPERADMIN_EMAIL, TestSite, UPLOADED_IMAGE, location, text,
};
use serde_json::json;

async fn logged_in() -> TestSite {
    let site = TestSite::start().await;
    site.login(SUPERADMIN_EMAIL, PASSWORD).await;
    site
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_categories_are_listed() {
    let site = logged_in().await;

    let response = site.get("/admin/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("Caps"));
    assert!(body.contains("Pens"));
}

#[tokio::test]
async fn test_create_category() {
    let site = logged_in().await;

    let response = site
        .post_form("/admin/categories", &[("name", "  Drinkware ")])
        .await;
    assert!(location(&response).starts_with("/admin/categories?success="));

    let calls = site.backend.calls_to(&Method::POST, "/categories");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body, json!({ "name": "Drinkware" }));
}

#[tokio::test]
async fn test_create_category_requires_a_name() {
    let site = logged_in().await;

    let response = site.post_form("/admin/categories", &[("name", "  ")]).await;
    assert!(location(&response).starts_with("/admin/categories?error="));
    assert!(site.backend.calls_to(&Method::POST, "/categories").is_empty());
}

#[tokio::test]
async fn test_delete_category_asks_first() {
    let site = logged_in().await;

    let response = site.post_form("/admin/categories/3/delete", &[]).await;
    assert_eq!(location(&response), "/admin/categories/3/delete");
    assert!(site.backend.calls_under(&Method::DELETE, "/categories").is_empty());

    let body = text(site.get("/admin/categories/3/delete").await).await;
    assert!(body.contains("Delete Category"));
    assert!(body.contains("Caps"));
}

#[tokio::test]
async fn test_delete_category_in_use_is_refused() {
    let site = logged_in().await;
    site.backend.respond(
        Method::DELETE,
        "/categories/3",
        StatusCode::CONFLICT,
        json!({ "error": "Cannot delete category that is in use by products" }),
    );

    let response = site
        .post_form("/admin/categories/3/delete", &[("confirm", "yes")])
        .await;
    let target = location(&response);
    assert!(target.starts_with("/admin/categories?error="));
    assert_eq!(site.backend.calls_to(&Method::DELETE, "/categories/3").len(), 1);

    let body = text(site.get(&target).await).await;
    assert!(body.contains("Cannot delete category that is in use by products"));
    assert!(body.contains("Caps"));
}

#[tokio::test]
async fn test_delete_category() {
    let site = logged_in().await;

    let response = site
        .post_form("/admin/categories/4/delete", &[("confirm", "yes")])
        .await;
    assert!(location(&response).starts_with("/admin/categories?success="));
    assert_eq!(site.backend.calls_to(&Method::DELETE, "/categories/4").len(), 1);
}

// =============================================================================
// Products and services
// =============================================================================

fn calendar() -> serde_json::Value {
    json!([{
        "id": 7,
        "name": "Calendar",
        "category": "Old Stock",
        "description": "Wall calendar",
        "image": "",
        "rating": 3.5,
    }])
}

#[tokio::test]
async fn test_catalog_lists_tolerate_missing_collections() {
    let site = logged_in().await;
    site.backend
        .respond(Method::GET, "/products", StatusCode::OK, json!(null));

    for path in ["/admin/products", "/admin/services"] {
        let response = site.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(text(response).await.contains("Nothing here yet."), "{path}");
    }
}

#[tokio::test]
async fn test_catalog_form_requires_fields() {
    let site = logged_in().await;

    let cases: [(&str, &[(&str, &str)], &str); 4] = [
        ("/admin/products", &[("description", "Wall calendar")], "Name is required"),
        ("/admin/services", &[("description", "Printing")], "Title is required"),
        ("/admin/products", &[("title", "Calendar")], "Description is required"),
        (
            "/admin/products",
            &[("title", "Calendar"), ("description", "Wall calendar")],
            "Category is required",
        ),
    ];
    for (path, fields, message) in cases {
        let response = site.post_multipart(path, fields).await;
        assert_eq!(response.status(), StatusCode::OK, "{message}");
        assert!(text(response).await.contains(message), "{message}");
    }
    assert!(site.backend.calls_to(&Method::POST, "/products").is_empty());
    assert!(
        site.backend
            .calls_to(&Method::POST, "/services-content/items")
            .is_empty()
    );
}

#[tokio::test]
async fn test_create_product_sends_category_name() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/products",
            &[
                ("title", " Branded Caps "),
                ("category", "id:3"),
                ("description", "Embroidered caps"),
                ("rating", "4"),
            ],
        )
        .await;
    assert!(location(&response).starts_with("/admin/products?success="));

    let calls = site.backend.calls_to(&Method::POST, "/products");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].body,
        json!({
            "name": "Branded Caps",
            "category": "Caps",
            "description": "Embroidered caps",
            "image": "",
            "rating": 4.0,
        })
    );
}

#[tokio::test]
async fn test_service_may_be_uncategorised() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/services",
            &[("title", "Screen Printing"), ("description", "Logos on fabric")],
        )
        .await;
    assert!(location(&response).starts_with("/admin/services?success="));

    let calls = site.backend.calls_to(&Method::POST, "/services-content/items");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["title"], json!("Screen Printing"));
    assert_eq!(calls[0].body["category"], json!(""));
}

#[tokio::test]
async fn test_edit_keeps_unlisted_category_and_exact_rating() {
    let site = logged_in().await;
    site.backend
        .respond(Method::GET, "/products", StatusCode::OK, calendar());

    let body = text(site.get("/admin/products/7/edit").await).await;
    assert!(body.contains(r#"value="name:Old Stock" selected"#));
    assert!(body.contains(r#"value="3.5" checked"#));

    // Saved back unchanged, as the browser would submit it.
    let response = site
        .post_multipart(
            "/admin/products/7",
            &[
                ("title", "Calendar"),
                ("category", "name:Old Stock"),
                ("description", "Wall calendar"),
                ("rating", "3.5"),
            ],
        )
        .await;
    assert!(location(&response).starts_with("/admin/products?success="));

    let calls = site.backend.calls_to(&Method::PUT, "/products/7");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["category"], json!("Old Stock"));
    assert_eq!(calls[0].body["rating"], json!(3.5));
}

#[tokio::test]
async fn test_category_deleted_meanwhile_is_refused() {
    let site = logged_in().await;

    let response = site
        .post_multipart(
            "/admin/products",
            &[
                ("title", "Calendar"),
                ("category", "id:99"),
                ("description", "Wall calendar"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("no longer exists"));
    assert!(site.backend.calls_to(&Method::POST, "/products").is_empty());
}

#[tokio::test]
async fn test_catalog_images_upload_by_kind() {
    let site = logged_in().await;

    let response = site
        .post_multipart_file(
            "/admin/products",
            &[
                ("title", "Branded Caps"),
                ("category", "id:3"),
                ("description", "Embroidered caps"),
            ],
            "upload:image",
            "cap.png",
        )
        .await;
    assert!(location(&response).starts_with("/admin/products?success="));

    let response = site
        .post_multipart_file(
            "/admin/services",
            &[("title", "Screen Printing"), ("description", "Logos on fabric")],
            "upload:image",
            "print.png",
        )
        .await;
    assert!(location(&response).starts_with("/admin/services?success="));

    let uploads = site.backend.calls_to(&Method::POST, "/admin/upload");
    assert_eq!(uploads.len(), 2);
    assert!(uploads[0].raw.contains(r#"name="uploadType""#));
    assert!(uploads[0].raw.contains("\r\n\r\nproducts\r\n"));
    assert!(uploads[1].raw.contains("\r\n\r\ncontent\r\n"));

    let products = site.backend.calls_to(&Method::POST, "/products");
    assert_eq!(products[0].body["image"], json!(UPLOADED_IMAGE));
}

#[tokio::test]
async fn test_delete_product_requires_confirmation() {
    let site = logged_in().await;
    site.backend
        .respond(Method::GET, "/products", StatusCode::OK, calendar());

    let response = site.post_form("/admin/products/7/delete", &[]).await;
    assert_eq!(location(&response), "/admin/products/7/delete");
    assert!(site.backend.calls_to(&Method::DELETE, "/products/7").is_empty());

    let body = text(site.get("/admin/products/7/delete").await).await;
    assert!(body.contains("Delete Product"));
    assert!(body.contains("Calendar"));

    let response = site
        .post_form("/admin/products/7/delete", &[("confirm", "yes")])
        .await;
    assert!(location(&response).starts_with("/admin/products?success="));
    assert_eq!(site.backend.calls_to(&Method::DELETE, "/products/7").len(), 1);
}

// =============================================================================
// Quote inbox
// =============================================================================

fn seed_quotes(site: &TestSite) {
    site.backend.respond(
        Method::GET,
        "/quotes",
        StatusCode::OK,
        json!([
            {
                "id": 11,
                "name": "Tendai Mhlanga",
                "email": "tendai@example.co.zw",
                "phone": "+263 77 123 4567",
                "company": "Mhlanga Holdings",
                "products": [{ "productId": 7, "productName": "Branded Caps", "quantity": 50 }],
                "status": "pending",
                "createdAt": "2024-05-01T09:00:00Z",
            },
            {
                "id": 12,
                "name": "Farai Chikore",
                "email": "farai@example.co.zw",
                "products": [],
                "status": "approved",
                "createdAt": "2024-05-03T09:00:00Z",
            },
        ]),
    );
}

#[tokio::test]
async fn test_quote_inbox_lists_newest_first() {
    let site = logged_in().await;
    seed_quotes(&site);

    let body = text(site.get("/admin/quotes").await).await;
    let newer = body.find("Farai Chikore");
    let older = body.find("Tendai Mhlanga");
    assert!(newer.is_some() && older.is_some());
    assert!(newer < older);
    assert!(body.contains("Branded Caps"));
}

#[tokio::test]
async fn test_quote_status_change() {
    let site = logged_in().await;

    let response = site
        .post_form("/admin/quotes/11/status", &[("status", "rejected")])
        .await;
    assert_eq!(location(&response), "/admin/quotes");

    let calls = site.backend.calls_to(&Method::PATCH, "/quotes/11");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body, json!({ "status": "rejected" }));
}

#[tokio::test]
async fn test_quote_whatsapp_reply() {
    let site = logged_in().await;
    seed_quotes(&site);

    let response = site.get("/admin/quotes/11/whatsapp").await;
    assert!(location(&response).starts_with("https://wa.me/263771234567?text="));

    let response = site.get("/admin/quotes/12/whatsapp").await;
    assert!(location(&response).starts_with("/admin/quotes?error="));

    let response = site.get("/admin/quotes/12/whatsapp?phone=%2B263772000111").await;
    assert!(location(&response).starts_with("https://wa.me/263772000111"));
}
