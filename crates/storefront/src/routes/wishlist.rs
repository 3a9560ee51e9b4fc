//! Wishlist route handlers.

use ark_core::ProductId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::local_redirect;
use crate::error::Result;
use crate::filters;
use crate::middleware::{
    Nav, load_backend_cookie, load_cart, load_wishlist, save_cart, save_wishlist,
};
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
    /// Local path to return to; defaults to the wishlist page.
    pub next: Option<String>,
}

/// Messages passed back after a refused move.
#[derive(Debug, Deserialize)]
pub struct WishlistQuery {
    pub error: Option<String>,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub nav: Nav,
    pub items: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

/// Display the wishlist.
#[instrument(skip(session, nav))]
pub async fn show(
    session: Session,
    nav: Nav,
    Query(query): Query<WishlistQuery>,
) -> Result<impl IntoResponse> {
    let wishlist = load_wishlist(&session).await?;
    let error = query
        .error
        .is_some()
        .then_some("That product is out of stock and stays on your wishlist.");

    Ok(WishlistTemplate {
        nav,
        items: wishlist.items().iter().map(ProductCardView::from).collect(),
        error,
    })
}

/// Save a product, or remove it if it is already saved.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let mut wishlist = load_wishlist(&session).await?;

    if wishlist.remove(&id).is_none() {
        let jar = load_backend_cookie(&session).await?;
        let product = state.backend().get_product(&id, &jar).await?;
        wishlist.add(product);
    }

    save_wishlist(&session, &wishlist).await?;
    Ok(local_redirect(form.next.as_deref(), "/wishlist"))
}

/// Move a saved product into the cart.
#[instrument(skip(session))]
pub async fn move_to_cart(session: Session, Form(form): Form<WishlistForm>) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let mut wishlist = load_wishlist(&session).await?;

    let Some(product) = wishlist.remove(&id) else {
        return Ok(Redirect::to("/wishlist").into_response());
    };

    let mut cart = load_cart(&session).await?;
    if cart.add(product, 1).is_err() {
        return Ok(Redirect::to("/wishlist?error=out_of_stock").into_response());
    }

    save_cart(&session, &cart).await?;
    save_wishlist(&session, &wishlist).await?;
    Ok(Redirect::to("/cart").into_response())
}
