//! Authentication extractors for admin.
//!
//! The cached `current_admin` only says who logged in last. Protected pages
//! ask the backend again on every request, so a session revoked at the
//! backend is noticed on the next click.

use ark_core::AdminProfile;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::session::load_backend_cookie;
use crate::models::session_keys;
use crate::state::AppState;

/// Login page path.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires a revalidated admin session.
///
/// Redirects to the login page for page requests. Paths under `/admin/api/`
/// and HTMX requests get 401 instead.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub AdminProfile);

/// Error returned when admin authentication is required but absent.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API and HTMX requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Whether a rejection should be a bare 401 rather than a redirect.
fn wants_status(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/admin/api/") || parts.headers.contains_key("hx-request")
}

async fn cached_admin(session: &Session) -> Option<AdminProfile> {
    session
        .get::<AdminProfile>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let reject = if wants_status(parts) {
            AdminAuthRejection::Unauthorized
        } else {
            AdminAuthRejection::RedirectToLogin
        };

        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        if cached_admin(&session).await.is_none() {
            return Err(reject);
        }

        let jar = load_backend_cookie(&session).await.unwrap_or_default();
        match state.backend().profile(&jar).await {
            Ok(Some(admin)) => {
                if let Err(e) = set_current_admin(&session, &admin).await {
                    tracing::warn!("Failed to refresh cached admin: {e}");
                }
                Ok(Self(admin))
            }
            Ok(None) => {
                tracing::info!("Admin profile came back without an id; clearing session");
                forget_admin(&session).await;
                Err(reject)
            }
            Err(e) => {
                tracing::info!("Admin session revalidation failed: {e}");
                forget_admin(&session).await;
                Err(reject)
            }
        }
    }
}

/// Extractor that resolves the admin when one can be found.
///
/// Uses the cached admin when present. Otherwise asks the backend, but only
/// if a backend cookie exists. Never rejects.
pub struct OptionalAdmin(pub Option<AdminProfile>);

impl FromRequestParts<AppState> for OptionalAdmin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self(None));
        };

        if let Some(admin) = cached_admin(&session).await {
            return Ok(Self(Some(admin)));
        }

        let jar = load_backend_cookie(&session).await.unwrap_or_default();
        if jar.is_empty() {
            return Ok(Self(None));
        }

        match state.backend().profile(&jar).await {
            Ok(Some(admin)) => {
                if let Err(e) = set_current_admin(&session, &admin).await {
                    tracing::debug!("Failed to cache admin: {e}");
                }
                Ok(Self(Some(admin)))
            }
            Ok(None) => Ok(Self(None)),
            Err(e) => {
                tracing::debug!("No admin session found: {e}");
                Ok(Self(None))
            }
        }
    }
}

async fn forget_admin(session: &Session) {
    if let Err(e) = clear_current_admin(session).await {
        tracing::error!("Failed to clear admin session: {e}");
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &AdminProfile,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Clear the cached admin and the backend cookie (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AdminProfile>(session_keys::CURRENT_ADMIN)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::BACKEND_COOKIE)
        .await?;
    Ok(())
}
