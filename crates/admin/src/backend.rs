//! Client for the backend's admin endpoints.
//!
//! # Endpoints
//!
//! ```text
//! POST   /api/admin/login          {email, password}
//! POST   /api/admin/logout
//! GET    /api/admin/profile
//! GET    /api/admin/products
//! GET    /api/admin/products/{id}
//! POST   /api/admin/products       ProductDraft
//! PUT    /api/admin/products/{id}  ProductDraft
//! DELETE /api/admin/products/{id}
//! ```
//!
//! The CLI drives the same client, so nothing here depends on the web layer.

use std::time::Duration;

use ark_core::http::{BackendError, BackendTransport};
use ark_core::{
    AdminProfile, BackendCookie, Email, Product, ProductDraft, ProductId, ProfileResponse,
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

const PRODUCTS_PATH: &str = "/api/admin/products";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

fn product_path(id: &ProductId) -> String {
    format!("{PRODUCTS_PATH}/{}", urlencoding::encode(id.as_str()))
}

/// Backend client for admin operations.
#[derive(Debug, Clone)]
pub struct AdminBackend {
    transport: BackendTransport,
}

impl AdminBackend {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            transport: BackendTransport::new(base_url, timeout)?,
        })
    }

    /// Log an admin in. Returns `None` when the backend answered without `_id`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the credentials.
    #[instrument(skip(self, password, jar), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
        jar: &mut BackendCookie,
    ) -> Result<Option<AdminProfile>, BackendError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let profile: ProfileResponse = self
            .transport
            .send_json(Method::POST, "/api/admin/login", &body, jar)
            .await?;
        Ok(profile.into_admin())
    }

    /// End the backend admin session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip_all)]
    pub async fn logout(&self, jar: &mut BackendCookie) -> Result<(), BackendError> {
        self.transport
            .send_empty::<()>(Method::POST, "/api/admin/logout", None, jar)
            .await
    }

    /// The admin the backend session belongs to, if any.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` when the session is gone.
    #[instrument(skip_all)]
    pub async fn profile(&self, jar: &BackendCookie) -> Result<Option<AdminProfile>, BackendError> {
        let profile: ProfileResponse = self.transport.get_json("/api/admin/profile", jar).await?;
        Ok(profile.into_admin())
    }

    /// Every product, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip_all)]
    pub async fn list_products(&self, jar: &BackendCookie) -> Result<Vec<Product>, BackendError> {
        self.transport.get_json(PRODUCTS_PATH, jar).await
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for unknown ids.
    #[instrument(skip(self, jar), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        id: &ProductId,
        jar: &BackendCookie,
    ) -> Result<Product, BackendError> {
        self.transport.get_json(&product_path(id), jar).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the draft.
    #[instrument(skip(self, draft, jar), fields(title = %draft.title))]
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        self.transport
            .send_empty(Method::POST, PRODUCTS_PATH, Some(draft), jar)
            .await
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the draft.
    #[instrument(skip(self, draft, jar), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        self.transport
            .send_empty(Method::PUT, &product_path(id), Some(draft), jar)
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, jar), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        id: &ProductId,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        self.transport
            .send_empty::<()>(Method::DELETE, &product_path(id), None, jar)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn backend(server: &MockServer) -> AdminBackend {
        AdminBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_login_captures_cookie_and_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .and(body_json(json!({"email": "root@ark.shop", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "jwt=abc; Path=/; HttpOnly")
                    .set_body_json(json!({"_id": "a1", "name": "Root", "email": "root@ark.shop"})),
            )
            .mount(&server)
            .await;

        let mut jar = BackendCookie::default();
        let admin = backend(&server)
            .await
            .login(
                &Email::parse("root@ark.shop").unwrap(),
                &SecretString::from("pw".to_string()),
                &mut jar,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(admin.name, "Root");
        assert_eq!(jar.get("jwt"), Some("abc"));
    }

    #[tokio::test]
    async fn test_profile_without_id_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;

        let profile = backend(&server)
            .await
            .profile(&BackendCookie::default())
            .await
            .unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_delete_sends_cookie_and_encodes_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/products/a%2Fb"))
            .and(header("cookie", "jwt=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut jar = BackendCookie::default();
        jar.absorb(["jwt=abc; Path=/"]);
        backend(&server)
            .await
            .delete_product(&ProductId::new("a/b"), &mut jar)
            .await
            .unwrap();
    }
}
