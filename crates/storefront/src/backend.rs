//! Client for the backend's catalog and shopper auth endpoints.
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products
//! GET  /api/products/{id}
//! POST /api/auth/login                  {email, password}
//! POST /api/auth/register               {name, email, password}
//! POST /api/auth/logout
//! POST /api/auth/forgot-password        {email}
//! POST /api/auth/reset-password/{token} {password}
//! POST /api/auth/send-otp               {email}
//! POST /api/auth/verify-otp             {email, otp}
//! POST /api/auth/reset-password-otp     {email, otp, password}
//! ```

use ark_core::http::{BackendError, BackendTransport};
use ark_core::{BackendCookie, Email, LoginResponse, Product, ProductId, ShopperProfile};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use crate::config::StorefrontConfig;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailOnly<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PasswordOnly<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct OtpCheck<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Serialize)]
struct OtpReset<'a> {
    email: &'a str,
    otp: &'a str,
    password: &'a str,
}

/// Backend client used by storefront handlers.
#[derive(Debug, Clone)]
pub struct StorefrontBackend {
    transport: BackendTransport,
}

impl StorefrontBackend {
    /// Create a client from storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, BackendError> {
        Ok(Self {
            transport: BackendTransport::new(&config.backend_url, config.backend_timeout)?,
        })
    }

    /// Fetch the full catalog in backend order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, jar))]
    pub async fn list_products(&self, jar: &BackendCookie) -> Result<Vec<Product>, BackendError> {
        self.transport.get_json("/api/products", jar).await
    }

    /// Fetch a single product.
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
        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        self.transport.get_json(&path, jar).await
    }

    /// Log a shopper in. Returns `None` when the backend answered without a
    /// user `_id`.
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
    ) -> Result<Option<ShopperProfile>, BackendError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self
            .transport
            .send_json(Method::POST, "/api/auth/login", &body, jar)
            .await?;
        Ok(response.into_profile().into_shopper())
    }

    /// Create a shopper account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if registration is refused.
    #[instrument(skip(self, password, jar), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let body = Registration {
            name,
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.transport
            .send_empty(Method::POST, "/api/auth/register", Some(&body), jar)
            .await
    }

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, jar))]
    pub async fn logout(&self, jar: &mut BackendCookie) -> Result<(), BackendError> {
        self.transport
            .send_empty::<()>(Method::POST, "/api/auth/logout", None, jar)
            .await
    }

    /// Request a password reset link by email.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, jar), fields(email = %email))]
    pub async fn forgot_password(
        &self,
        email: &Email,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let body = EmailOnly {
            email: email.as_str(),
        };
        self.transport
            .send_empty(Method::POST, "/api/auth/forgot-password", Some(&body), jar)
            .await
    }

    /// Set a new password using an emailed reset token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the token is rejected.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let path = format!("/api/auth/reset-password/{}", urlencoding::encode(token));
        let body = PasswordOnly {
            password: password.expose_secret(),
        };
        self.transport
            .send_empty(Method::POST, &path, Some(&body), jar)
            .await
    }

    /// Email a one-time code for password reset.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, jar), fields(email = %email))]
    pub async fn send_otp(
        &self,
        email: &Email,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let body = EmailOnly {
            email: email.as_str(),
        };
        self.transport
            .send_empty(Method::POST, "/api/auth/send-otp", Some(&body), jar)
            .await
    }

    /// Check a one-time code.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the code is rejected.
    #[instrument(skip(self, otp, jar), fields(email = %email))]
    pub async fn verify_otp(
        &self,
        email: &Email,
        otp: &str,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let body = OtpCheck {
            email: email.as_str(),
            otp,
        };
        self.transport
            .send_empty(Method::POST, "/api/auth/verify-otp", Some(&body), jar)
            .await
    }

    /// Set a new password using a verified one-time code.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the code or password is rejected.
    #[instrument(skip(self, otp, password, jar), fields(email = %email))]
    pub async fn reset_password_otp(
        &self,
        email: &Email,
        otp: &str,
        password: &SecretString,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let body = OtpReset {
            email: email.as_str(),
            otp,
            password: password.expose_secret(),
        };
        self.transport
            .send_empty(Method::POST, "/api/auth/reset-password-otp", Some(&body), jar)
            .await
    }
}
