//! One-time code password reset wizard.

#![allow(clippy::unwrap_used)]

use ark_integration_tests::{TestApp, browser, location, spawn_storefront};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "shopper@ark.shop";

async fn otp_backend() -> MockServer {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/send-otp"))
        .and(body_json(json!({"email": EMAIL})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({"email": EMAIL, "otp": "123456"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .with_priority(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Invalid or expired OTP"})),
        )
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password-otp"))
        .and(body_json(json!({"email": EMAIL, "otp": "123456", "password": "new-secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "reset"})))
        .expect(1)
        .mount(&backend)
        .await;
    backend
}

async fn get_location(client: &reqwest::Client, app: &TestApp, target: &str) -> Option<String> {
    let resp = client.get(app.url(target)).send().await.unwrap();
    location(&resp).map(String::from)
}

#[tokio::test]
async fn test_later_steps_require_earlier_ones() {
    let backend = otp_backend().await;
    let app = spawn_storefront(&backend).await;
    let client = browser();

    for step in ["/verify-otp", "/otp-reset-password"] {
        assert_eq!(
            get_location(&client, &app, step).await.as_deref(),
            Some("/otp-forgot-password"),
            "{step}"
        );
    }

    let resp = client
        .post(app.url("/otp-reset-password"))
        .form(&[("password", "x"), ("confirm_password", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), Some("/otp-forgot-password"));
}

#[tokio::test]
async fn test_full_wizard_in_order() {
    let backend = otp_backend().await;
    let app = spawn_storefront(&backend).await;
    let client = browser();

    let resp = client
        .post(app.url("/otp-forgot-password"))
        .form(&[("email", EMAIL)])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), Some("/verify-otp"));

    // Code sent but not verified: step 3 is still closed
    assert_eq!(
        get_location(&client, &app, "/otp-reset-password").await.as_deref(),
        Some("/otp-forgot-password")
    );

    let resp = client.get(app.url("/verify-otp")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains(EMAIL));

    let resp = client
        .post(app.url("/verify-otp"))
        .form(&[("otp", "000000")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Invalid or expired OTP"));

    let resp = client
        .post(app.url("/verify-otp"))
        .form(&[("otp", "123456")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), Some("/otp-reset-password"));

    let resp = client
        .post(app.url("/otp-reset-password"))
        .form(&[("password", "new-secret"), ("confirm_password", "other")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Passwords do not match"));

    let resp = client
        .post(app.url("/otp-reset-password"))
        .form(&[("password", "new-secret"), ("confirm_password", "new-secret")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), Some("/login?reset=1"));

    // Wizard state is gone once the password is set
    assert_eq!(
        get_location(&client, &app, "/otp-reset-password").await.as_deref(),
        Some("/otp-forgot-password")
    );
}
