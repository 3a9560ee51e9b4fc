//! REST transport to the backend service.
//!
//! Thin wrapper over `reqwest` shared by the storefront, admin and CLI
//! clients. Every call is a single request: no retries, no backoff.
//!
//! # Credentials
//!
//! Calls take the caller's [`BackendCookie`]. Its `Cookie` header is
//! attached to the request, and mutating calls fold any `Set-Cookie`
//! response headers back into it so login responses establish the session.

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::BackendCookie;

/// Errors returned by backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 401 or 403 from the backend.
    #[error("Unauthorized ({status})")]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    /// 404 from the backend.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("API error: {status} - {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Success status but the body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl BackendError {
    /// The backend's `message`, or `fallback` when it sent none.
    #[must_use]
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Unauthorized {
                message: Some(m), ..
            }
            | Self::Api {
                message: Some(m), ..
            } => m,
            _ => fallback,
        }
    }

    /// Whether the backend rejected the caller's credentials (401/403).
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// HTTP status reported by the backend, if it answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}

/// Error body shape used by the backend.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Shared HTTP plumbing for backend clients.
#[derive(Debug, Clone)]
pub struct BackendTransport {
    client: reqwest::Client,
    base_url: String,
}

impl BackendTransport {
    /// Create a transport for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ark/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Absolute URL for an API path such as `/api/products`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-success status, or
    /// a body that does not deserialize into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        jar: &BackendCookie,
    ) -> Result<T, BackendError> {
        let request = self.request(Method::GET, path, jar);
        let response = Self::execute(request).await?;
        Self::parse_json(response).await
    }

    /// Send a JSON body and parse a JSON response.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-success status, or
    /// a body that does not deserialize into `T`.
    pub async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        jar: &mut BackendCookie,
    ) -> Result<T, BackendError> {
        let request = self.request(method, path, jar).json(body);
        let response = Self::execute(request).await?;
        absorb_set_cookie(&response, jar);
        Self::parse_json(response).await
    }

    /// Send a request whose response body is not needed.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or non-success status.
    pub async fn send_empty<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        jar: &mut BackendCookie,
    ) -> Result<(), BackendError> {
        let mut request = self.request(method, path, jar);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = Self::execute(request).await?;
        absorb_set_cookie(&response, jar);
        Ok(())
    }

    fn request(&self, method: Method, path: &str, jar: &BackendCookie) -> RequestBuilder {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, "Backend request");

        let request = self.client.request(method, url);
        match jar.header_value() {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    async fn execute(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(Self::parse_error(response).await)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")))
    }

    async fn parse_error(response: Response) -> BackendError {
        let status = response.status();
        let url = response.url().path().to_owned();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());

        tracing::debug!(status = status.as_u16(), %url, ?message, "Backend error response");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => BackendError::NotFound(message.unwrap_or(url)),
            _ => BackendError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

fn absorb_set_cookie(response: &Response, jar: &mut BackendCookie) {
    jar.absorb(
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok()),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn transport(server: &MockServer) -> BackendTransport {
        BackendTransport::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = BackendError::Api {
            status: 400,
            message: Some("SKU already exists".to_string()),
        };
        assert_eq!(err.user_message("Failed to save product"), "SKU already exists");

        let err = BackendError::NotFound("/api/products/x".to_string());
        assert_eq!(err.user_message("Failed"), "Failed");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_send_json_captures_cookie_and_replays_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "jwt=token-1; Path=/; HttpOnly")
                    .set_body_json(json!({ "_id": "a1" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/admin/profile"))
            .and(header("cookie", "jwt=token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "a1" })))
            .mount(&server)
            .await;

        let transport = transport(&server).await;
        let mut jar = BackendCookie::new();
        let _: serde_json::Value = transport
            .send_json(Method::POST, "/api/admin/login", &json!({}), &mut jar)
            .await
            .unwrap();
        assert_eq!(jar.get("jwt"), Some("token-1"));

        let profile: serde_json::Value = transport
            .get_json("/api/admin/profile", &jar)
            .await
            .unwrap();
        assert_eq!(profile["_id"], "a1");
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_variants() {
        let server = MockServer::start().await;
        Mock::given(path("/forbidden"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "message": "Not an admin" })),
            )
            .mount(&server)
            .await;
        Mock::given(path("/boom"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = transport(&server).await;
        let jar = BackendCookie::new();

        let err = transport
            .get_json::<serde_json::Value>("/forbidden", &jar)
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.user_message("x"), "Not an admin");

        let err = transport
            .get_json::<serde_json::Value>("/boom", &jar)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Api { status: 500, message: None }));

        let err = transport
            .get_json::<serde_json::Value>("/missing", &jar)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }
}
