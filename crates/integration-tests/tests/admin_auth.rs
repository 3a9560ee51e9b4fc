//! Admin login and route guard.

#![allow(clippy::unwrap_used)]

use ark_integration_tests::{
    ADMIN_EMAIL, admin_login, browser, location, mount_admin_session, spawn_admin,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_unauthenticated_visit_redirects_to_login() {
    let backend = MockServer::start().await;
    let app = spawn_admin(&backend).await;
    let client = browser();

    for target in ["/admin/products", "/admin/dashboard", "/admin/products/create"] {
        let resp = client.get(app.url(target)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{target}");
        assert_eq!(location(&resp), Some("/admin/login"), "{target}");
    }
}

#[tokio::test]
async fn test_unauthenticated_htmx_request_gets_status() {
    let backend = MockServer::start().await;
    let app = spawn_admin(&backend).await;

    let resp = browser()
        .post(app.url("/admin/products/p1/delete"))
        .header("hx-request", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failure_shows_backend_message() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Invalid admin credentials"})),
        )
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;

    let resp = browser()
        .post(app.url("/admin/login"))
        .form(&[("email", ADMIN_EMAIL), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid admin credentials"));
    assert!(body.contains(ADMIN_EMAIL), "email is kept in the form");
}

#[tokio::test]
async fn test_login_then_dashboard_then_logout() {
    let backend = MockServer::start().await;
    mount_admin_session(&backend).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();

    admin_login(&client, &app).await;

    let resp = client.get(app.url("/admin/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin/dashboard"));

    let resp = client.get(app.url("/admin/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Welcome, Root"));
    assert!(body.contains(r#""includeIndicatorStyles":false"#));

    let resp = client.post(app.url("/admin/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin/login"));

    let resp = client.get(app.url("/admin/dashboard")).send().await.unwrap();
    assert_eq!(location(&resp), Some("/admin/login"));
}

#[tokio::test]
async fn test_revoked_backend_session_logs_admin_out() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "jwt=admin-token; Path=/")
                .set_body_json(ark_integration_tests::admin_profile()),
        )
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;
    let client = browser();

    admin_login(&client, &app).await;

    let resp = client.get(app.url("/admin/products")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin/login"));
}
