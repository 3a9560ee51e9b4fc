//! Product listing and detail handlers.

use ark_core::http::BackendError;
use ark_core::{Gender, Product, ProductId, StockLevel, catalog};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{Nav, load_backend_cookie, load_wishlist};
use crate::state::AppState;

/// Message shown when the catalog cannot be loaded.
pub const CATALOG_ERROR: &str = "Failed to load products. Please try again later.";

/// Product card data for grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price: String,
    pub original_price: Option<String>,
    pub image: Option<String>,
    pub in_stock: bool,
    pub stock_class: &'static str,
    pub stock_label: String,
}

/// Product detail data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub card: ProductCardView,
    pub description: String,
    pub sku: String,
    pub category: String,
    pub gender: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub max_quantity: i64,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Badge class and label for a stock level.
#[must_use]
pub fn stock_badge(product: &Product) -> (&'static str, String) {
    match product.stock_level() {
        StockLevel::InStock => ("stock-high", "In stock".to_string()),
        StockLevel::Low => ("stock-low", format!("Only {} left", product.stock)),
        StockLevel::Out => ("stock-out", "Out of stock".to_string()),
    }
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let (stock_class, stock_label) = stock_badge(product);
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            brand: product.brand.clone(),
            price: product.effective_price().to_string(),
            original_price: product.has_discount().then(|| product.price.to_string()),
            image: product.card_image().map(String::from),
            in_stock: product.is_in_stock(),
            stock_class,
            stock_label,
        }
    }
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        let mut images: Vec<String> = Vec::new();
        for url in std::iter::once(&product.thumbnail).chain(&product.images) {
            if !url.is_empty() && !images.contains(url) {
                images.push(url.clone());
            }
        }

        Self {
            card: ProductCardView::from(product),
            description: product.description.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            gender: product.gender.to_string(),
            tags: product.tags.clone(),
            images,
            max_quantity: product.stock.max(1),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Department listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/department.html")]
pub struct DepartmentTemplate {
    pub nav: Nav,
    pub title: &'static str,
    pub products: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: Nav,
    pub product: ProductDetailView,
    pub in_wishlist: bool,
    pub error: Option<&'static str>,
}

/// Product not found template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub nav: Nav,
}

/// Messages passed back to the detail page after a refused action.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn department(
    state: &AppState,
    session: &Session,
    nav: Nav,
    gender: Gender,
) -> Result<Response> {
    let jar = load_backend_cookie(session).await?;

    let (products, error) = match state.backend().list_products(&jar).await {
        Ok(all) => (
            catalog::for_department(&all, gender)
                .into_iter()
                .map(ProductCardView::from)
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch products for {gender}: {e}");
            (Vec::new(), Some(CATALOG_ERROR))
        }
    };

    Ok(DepartmentTemplate {
        nav,
        title: gender.as_str(),
        products,
        error,
    }
    .into_response())
}

/// Men's department.
#[instrument(skip(state, session, nav))]
pub async fn men(State(state): State<AppState>, session: Session, nav: Nav) -> Result<Response> {
    department(&state, &session, nav, Gender::Men).await
}

/// Women's department.
#[instrument(skip(state, session, nav))]
pub async fn women(State(state): State<AppState>, session: Session, nav: Nav) -> Result<Response> {
    department(&state, &session, nav, Gender::Women).await
}

/// Kids' department.
#[instrument(skip(state, session, nav))]
pub async fn kids(State(state): State<AppState>, session: Session, nav: Nav) -> Result<Response> {
    department(&state, &session, nav, Gender::Kids).await
}

/// Display product detail page.
#[instrument(skip(state, session, nav))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Path(id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let jar = load_backend_cookie(&session).await?;

    let product = match state.backend().get_product(&id, &jar).await {
        Ok(product) => product,
        Err(BackendError::NotFound(_)) => {
            return Ok((StatusCode::NOT_FOUND, ProductNotFoundTemplate { nav }).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let in_wishlist = load_wishlist(&session).await?.contains(&product.id);
    let error = match query.error.as_deref() {
        Some("out_of_stock") => Some("This product is out of stock."),
        Some(_) => Some("Something went wrong. Please try again."),
        None => None,
    };

    Ok(ProductShowTemplate {
        nav,
        product: ProductDetailView::from(&product),
        in_wishlist,
        error,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_card_shows_discount_and_badge() {
        let p = product(json!({
            "_id": "p1", "title": "Parka", "price": 120, "discountPrice": 99.5,
            "stock": 4, "images": ["https://cdn.ark.shop/parka.jpg"]
        }));
        let card = ProductCardView::from(&p);
        assert_eq!(card.price, "$99.50");
        assert_eq!(card.original_price.as_deref(), Some("$120.00"));
        assert_eq!(card.image.as_deref(), Some("https://cdn.ark.shop/parka.jpg"));
        assert_eq!(card.stock_class, "stock-low");
        assert_eq!(card.stock_label, "Only 4 left");
    }

    #[test]
    fn test_detail_dedupes_gallery() {
        let p = product(json!({
            "_id": "p1", "title": "Parka", "price": 120, "stock": 0,
            "thumbnail": "https://cdn/a.jpg",
            "images": ["https://cdn/a.jpg", "", "https://cdn/b.jpg"]
        }));
        let detail = ProductDetailView::from(&p);
        assert_eq!(detail.images, ["https://cdn/a.jpg", "https://cdn/b.jpg"]);
        assert!(!detail.card.in_stock);
        assert_eq!(detail.card.stock_label, "Out of stock");
        assert_eq!(detail.max_quantity, 1);
    }
}
