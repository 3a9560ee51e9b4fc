//! Shopper profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::{Nav, RequireShopper};

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub name: String,
    pub email: String,
}

/// Display the logged-in shopper's profile.
#[instrument(skip_all)]
pub async fn profile(RequireShopper(shopper): RequireShopper, nav: Nav) -> impl IntoResponse {
    ProfileTemplate {
        nav,
        name: shopper.name,
        email: shopper.email.into_inner(),
    }
}
