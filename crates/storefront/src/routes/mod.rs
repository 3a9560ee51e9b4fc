//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (featured products)
//! GET  /men | /women | /kids      - Department listings
//! GET  /product/{id}              - Product detail
//!
//! # Cart
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add product (snapshot from backend)
//! POST /cart/update               - Set quantity (0 removes)
//! POST /cart/remove               - Remove product
//!
//! # Wishlist
//! GET  /wishlist                  - Wishlist page
//! POST /wishlist/toggle           - Save or unsave a product
//! POST /wishlist/move-to-cart     - Move a saved product into the cart
//!
//! # Account
//! GET  /profile                   - Profile (requires login)
//! GET  /login     POST /login     - Login
//! GET  /signup    POST /signup    - Signup
//! POST /logout                    - Logout
//!
//! # Password recovery
//! GET|POST /forgot-password           - Request reset link
//! GET|POST /reset-password/{token}    - Reset with emailed token
//! GET|POST /otp-forgot-password       - OTP step 1: send code
//! GET|POST /verify-otp                - OTP step 2: check code
//! GET|POST /otp-reset-password        - OTP step 3: new password
//! ```
//!
//! POSTs to login, signup and every recovery step share a per-IP rate limiter
//! when enabled.

pub mod account;
pub mod auth;
pub mod cart;
pub mod home;
pub mod password;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    handler::Handler,
    response::Redirect,
    routing::{MethodRouter, get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Redirect to `next` when it is a local path, else to `default`.
///
/// Rejects absolute and protocol-relative URLs so form fields cannot send
/// shoppers off-site.
pub(crate) fn local_redirect(next: Option<&str>, default: &str) -> Redirect {
    let target = next
        .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
        .unwrap_or(default);
    Redirect::to(target)
}

/// A POST route, rate limited when a limiter is configured.
fn limited_post<H, T>(handler: H, limiter: Option<&RateLimiterLayer>) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    let route = post(handler);
    match limiter {
        Some(limiter) => route.layer(limiter.clone()),
        None => route,
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create the login, signup and password recovery routes.
pub fn auth_routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(limited_post(auth::login, limiter)),
        )
        .route(
            "/signup",
            get(auth::signup_page).merge(limited_post(auth::signup, limiter)),
        )
        .route("/logout", post(auth::logout))
        .route(
            "/forgot-password",
            get(password::forgot_password_page)
                .merge(limited_post(password::forgot_password, limiter)),
        )
        .route(
            "/reset-password/{token}",
            get(password::reset_password_page)
                .merge(limited_post(password::reset_password, limiter)),
        )
        .route(
            "/otp-forgot-password",
            get(password::otp_request_page).merge(limited_post(password::otp_request, limiter)),
        )
        .route(
            "/verify-otp",
            get(password::otp_verify_page).merge(limited_post(password::otp_verify, limiter)),
        )
        .route(
            "/otp-reset-password",
            get(password::otp_reset_page).merge(limited_post(password::otp_reset, limiter)),
        )
}

/// Create all routes for the storefront.
pub fn routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/men", get(products::men))
        .route("/women", get(products::women))
        .route("/kids", get(products::kids))
        .route("/product/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .route("/profile", get(account::profile))
        .merge(auth_routes(limiter))
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;

    use super::*;

    fn location(redirect: Redirect) -> String {
        let response = redirect.into_response();
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_local_redirect_accepts_paths() {
        assert_eq!(location(local_redirect(Some("/product/p1"), "/cart")), "/product/p1");
        assert_eq!(location(local_redirect(None, "/cart")), "/cart");
    }

    #[test]
    fn test_local_redirect_rejects_offsite_targets() {
        for next in ["https://evil.example", "//evil.example", "/\\evil.example", ""] {
            assert_eq!(location(local_redirect(Some(next), "/wishlist")), "/wishlist");
        }
    }
}
