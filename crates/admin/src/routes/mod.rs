//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /admin                             - Redirect to dashboard
//!
//! # Auth
//! GET  /admin/login                       - Login page
//! POST /admin/login                       - Login with email and password
//! POST /admin/logout                      - Logout
//!
//! # Dashboard
//! GET  /admin/dashboard                   - Overview with links
//!
//! # Products
//! GET  /admin/products                    - List (?q=&category=&view=list|grid&deleted=1)
//! GET  /admin/products/create             - Create form
//! POST /admin/products/create             - Create (or add/remove image rows)
//! GET  /admin/products/edit/{id}          - Edit form prefilled from the backend
//! POST /admin/products/edit/{id}          - Update (or add/remove image rows)
//! GET  /admin/products/view/{id}          - Read-only detail
//! GET  /admin/products/{id}/delete        - Delete confirmation
//! POST /admin/products/{id}/delete        - Delete (HTMX: empty 200)
//! ```
//!
//! Everything except login and logout requires a revalidated admin session.

pub mod auth;
pub mod dashboard;
pub mod products;

use ark_core::AdminProfile;
use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Signed-in admin shown in the page header.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&AdminProfile> for AdminUserView {
    fn from(admin: &AdminProfile) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::to("/admin/dashboard") }))
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route("/admin/products", get(products::index))
        .route(
            "/admin/products/create",
            get(products::create_page).post(products::create),
        )
        .route(
            "/admin/products/edit/{id}",
            get(products::edit_page).post(products::update),
        )
        .route("/admin/products/view/{id}", get(products::show))
        .route(
            "/admin/products/{id}/delete",
            get(products::delete_confirm).post(products::delete),
        )
}
