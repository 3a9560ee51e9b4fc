//! Test harness for the Ark web binaries.
//!
//! Each test starts a `wiremock` server standing in for the backend, then
//! serves the real router on an ephemeral loopback port and drives it with a
//! cookie-keeping `reqwest` client that does not follow redirects.
//!
//! ```rust,ignore
//! let backend = MockServer::start().await;
//! let admin = spawn_admin(&backend).await;
//! let client = browser();
//! let resp = client.get(admin.url("/admin/products")).send().await?;
//! assert_eq!(resp.status(), StatusCode::SEE_OTHER);
//! ```

use std::net::SocketAddr;

use axum::Router;
use reqwest::header::LOCATION;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Email and password every admin test logs in with.
pub const ADMIN_EMAIL: &str = "root@ark.shop";
pub const ADMIN_PASSWORD: &str = "correct horse";

/// A router served on a loopback port for the duration of a test.
pub struct TestApp {
    pub addr: SocketAddr,
}

impl TestApp {
    /// Absolute URL for `path` on this app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

async fn serve(router: Router) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });

    TestApp { addr }
}

/// Serve the admin console against `backend`.
pub async fn spawn_admin(backend: &MockServer) -> TestApp {
    let config = ark_admin::config::AdminConfig::local(&backend.uri());
    let state = ark_admin::state::AppState::new(config).expect("Failed to build admin state");
    serve(ark_admin::app::build_router(state)).await
}

/// Serve the storefront against `backend`.
pub async fn spawn_storefront(backend: &MockServer) -> TestApp {
    let config = ark_storefront::config::StorefrontConfig::local(&backend.uri());
    let state =
        ark_storefront::state::AppState::new(config).expect("Failed to build storefront state");
    serve(ark_storefront::app::build_router(state)).await
}

/// A client that keeps cookies and reports redirects instead of following them.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build test client")
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}

/// The backend's view of the test administrator.
#[must_use]
pub fn admin_profile() -> Value {
    json!({"_id": "a1", "name": "Root", "email": ADMIN_EMAIL})
}

/// A backend product record.
#[must_use]
pub fn product_json(id: &str, title: &str, price: f64, stock: i64) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": "Test product",
        "price": price,
        "stock": stock,
        "SKU": format!("SKU-{id}"),
        "brand": "Ark",
        "category": "Shoes",
        "gender": "Men",
        "tags": ["test"],
        "thumbnail": "",
        "images": []
    })
}

/// Mount a backend that accepts the test admin and keeps its session valid.
pub async fn mount_admin_session(backend: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "jwt=admin-token; Path=/; HttpOnly")
                .set_body_json(admin_profile()),
        )
        .mount(backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_profile()))
        .mount(backend)
        .await;
}

/// Submit the admin login form and expect a redirect to the dashboard.
pub async fn admin_login(client: &reqwest::Client, app: &TestApp) {
    let response = client
        .post(app.url("/admin/login"))
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/dashboard"));
}
