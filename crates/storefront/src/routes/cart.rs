//! Cart route handlers.
//!
//! The cart is kept in the session. Adding a product takes a fresh snapshot
//! from the backend so stock limits and prices are current; updates and
//! removals work on the stored snapshot.

use ark_core::ProductId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::local_redirect;
use crate::error::Result;
use crate::filters;
use crate::middleware::{Nav, load_backend_cookie, load_cart, save_cart};
use crate::models::{Cart, CartError, CartLine};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub price: String,
    pub quantity: u32,
    pub max_quantity: i64,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id.to_string(),
            title: line.product.title.clone(),
            image: line.product.card_image().map(String::from),
            price: line.product.effective_price().to_string(),
            quantity: line.quantity,
            max_quantity: line.product.stock.max(1),
            line_total: line.line_total().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Raw field text; browsers send an empty string for a cleared input.
    pub quantity: Option<String>,
    /// Local path to return to; defaults to the cart page.
    pub next: Option<String>,
}

impl AddToCartForm {
    /// Requested quantity, or one when the field is blank or not a number.
    fn requested_quantity(&self) -> u32 {
        self.quantity
            .as_deref()
            .map(str::trim)
            .and_then(|q| q.parse().ok())
            .unwrap_or(1)
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(session, nav))]
pub async fn show(session: Session, nav: Nav) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartShowTemplate {
        nav,
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart.
///
/// Out-of-stock products bounce back to their page with a message.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id.clone());
    let jar = load_backend_cookie(&session).await?;
    let product = state.backend().get_product(&id, &jar).await?;

    let mut cart = load_cart(&session).await?;
    match cart.add(product, form.requested_quantity()) {
        Ok(quantity) => {
            tracing::debug!(product_id = %id, quantity, "Added to cart");
            save_cart(&session, &cart).await?;
            Ok(local_redirect(form.next.as_deref(), "/cart").into_response())
        }
        Err(CartError::OutOfStock(title)) => {
            tracing::info!(product_id = %id, "Refused out-of-stock product {title}");
            let target = format!(
                "/product/{}?error=out_of_stock",
                urlencoding::encode(id.as_str())
            );
            Ok(Redirect::to(&target).into_response())
        }
    }
}

/// Set a line's quantity; zero removes it.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    if cart.set_quantity(&ProductId::new(form.product_id), form.quantity) {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    if cart.remove(&ProductId::new(form.product_id)) {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to("/cart"))
}
