//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{Nav, load_backend_cookie};
use crate::routes::products::{CATALOG_ERROR, ProductCardView};
use crate::state::AppState;

/// Number of products in the featured grid.
const FEATURED_PRODUCTS: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub featured: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

/// Display the home page.
#[instrument(skip(state, session, nav))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
) -> Result<impl IntoResponse> {
    let jar = load_backend_cookie(&session).await?;

    let (featured, error) = match state.backend().list_products(&jar).await {
        Ok(products) => (
            products
                .iter()
                .take(FEATURED_PRODUCTS)
                .map(ProductCardView::from)
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch featured products: {e}");
            (Vec::new(), Some(CATALOG_ERROR))
        }
    };

    Ok(HomeTemplate {
        nav,
        featured,
        error,
    })
}
