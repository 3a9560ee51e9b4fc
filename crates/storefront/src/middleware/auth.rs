//! Shopper authentication extractors.
//!
//! The backend owns shopper accounts. A shopper counts as logged in while
//! their profile is cached in the session; the backend cookie stored beside
//! it carries the backend's own session.

use ark_core::ShopperProfile;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::session_keys;

/// Extractor that requires a logged-in shopper.
///
/// If no shopper is cached, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireShopper(shopper): RequireShopper) -> impl IntoResponse {
///     format!("Hello, {}!", shopper.display_name())
/// }
/// ```
pub struct RequireShopper(pub ShopperProfile);

/// Error returned when a shopper session is required but absent.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (no session layer).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

async fn cached_shopper(parts: &Parts) -> Option<ShopperProfile> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<ShopperProfile>(session_keys::CURRENT_SHOPPER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireShopper
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if parts.extensions.get::<Session>().is_none() {
            return Err(AuthRejection::Unauthorized);
        }
        cached_shopper(parts)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the logged-in shopper.
pub struct OptionalShopper(pub Option<ShopperProfile>);

impl<S> FromRequestParts<S> for OptionalShopper
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(cached_shopper(parts).await))
    }
}

/// Cache the logged-in shopper in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_shopper(
    session: &Session,
    shopper: &ShopperProfile,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_SHOPPER, shopper)
        .await
}

/// Forget the shopper and the backend cookie (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_shopper(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<ShopperProfile>(session_keys::CURRENT_SHOPPER)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::BACKEND_COOKIE)
        .await?;
    Ok(())
}
