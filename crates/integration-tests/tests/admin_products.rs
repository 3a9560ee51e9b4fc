//! Admin product management.

#![allow(clippy::unwrap_used)]

use ark_integration_tests::{
    admin_login, browser, location, mount_admin_session, product_json, spawn_admin,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_list_shows_products_and_stats() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json("p1", "Trail Runner", 89.99, 25),
            product_json("p2", "Road Racer", 120.0, 3),
        ])))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let body = client
        .get(app.url("/admin/products?q=trail"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Trail Runner"));
    assert!(!body.contains("Road Racer"));
    assert!(body.contains("<strong>2</strong> total"));
    assert!(body.contains("<strong>1</strong> low stock"));
}

#[tokio::test]
async fn test_rejected_list_sends_admin_back_to_login() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Not admin"})))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let resp = client.get(app.url("/admin/products")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Failed to fetch products"));
    assert!(body.contains(r#"content="2;url=/admin/login""#));
}

#[tokio::test]
async fn test_create_clears_form_and_schedules_return() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .and(body_partial_json(json!({"title": "Trail Runner", "stock": 25, "SKU": "TR-1"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(product_json("p9", "Trail Runner", 89.99, 25)),
        )
        .expect(1)
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let resp = client
        .post(app.url("/admin/products/create"))
        .form(&[
            ("title", "Trail Runner"),
            ("price", "89.99"),
            ("stock", "25"),
            ("sku", "TR-1"),
            ("gender", "Men"),
            ("images", "https://img.ark.shop/1.jpg"),
            ("action", "save"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Product created successfully!"));
    assert!(body.contains(r#"content="2;url=/admin/products""#));
    assert!(body.contains(r#"name="title" value="""#));
    assert!(!body.contains("https://img.ark.shop/1.jpg"));
}

#[tokio::test]
async fn test_invalid_price_is_not_sent() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let body = client
        .post(app.url("/admin/products/create"))
        .form(&[("title", "Cap"), ("price", "ten"), ("stock", "1")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Price must be a number"));
    assert!(body.contains(r#"name="title" value="Cap""#));
}

#[tokio::test]
async fn test_add_image_row_round_trips_form() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let body = client
        .post(app.url("/admin/products/create"))
        .form(&[
            ("title", "Cap"),
            ("images", "https://img.ark.shop/a.jpg"),
            ("action", "add_image"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("https://img.ark.shop/a.jpg"));
    assert!(body.contains(r#"value="remove_image:1""#));
    assert!(!body.contains("created successfully"));
}

#[tokio::test]
async fn test_update_keeps_values() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/products/p1"))
        .and(body_partial_json(json!({"title": "Trail Runner v2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let body = client
        .post(app.url("/admin/products/edit/p1"))
        .form(&[("title", "Trail Runner v2"), ("price", "80"), ("stock", "4")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Product updated successfully!"));
    assert!(body.contains(r#"value="Trail Runner v2""#));
}

#[tokio::test]
async fn test_htmx_delete_removes_in_place() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let resp = client
        .post(app.url("/admin/products/p1/delete"))
        .header("hx-request", "true")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(location(&resp).is_none());
    assert!(resp.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_htmx_delete_failure_targets_flash() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let resp = client
        .post(app.url("/admin/products/p1/delete"))
        .header("hx-request", "true")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("hx-retarget").and_then(|v| v.to_str().ok()),
        Some("#flash")
    );
}

#[tokio::test]
async fn test_plain_delete_redirects_to_list() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();
    admin_login(&client, &app).await;

    let resp = client.post(app.url("/admin/products/p1/delete")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin/products?deleted=1"));
}
