//! Product management route handlers.
//!
//! The list loads the whole catalog once and filters it in memory. Create and
//! edit share one form; image rows are added and removed by posting the form
//! back with an `action` button, so the page works without JavaScript.

use ark_core::catalog::{self, InventoryStats};
use ark_core::http::BackendError;
use ark_core::{Gender, Product, ProductId, StockLevel};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::AdminUserView;
use crate::filters;
use crate::middleware::{RequireAdmin, load_backend_cookie, save_backend_cookie};
use crate::models::{DraftError, ProductForm};
use crate::state::AppState;

const PRODUCTS_PATH: &str = "/admin/products";
const LIST_ERROR: &str = "Failed to fetch products. Make sure you are logged in as admin.";
const FETCH_ERROR: &str = "Failed to fetch product details";
const SAVE_ERROR: &str = "Failed to save product";
const DELETE_ERROR: &str = "Failed to delete product";
const FIX_FIELDS: &str = "Please fix the highlighted fields.";

// =============================================================================
// View Types
// =============================================================================

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub view: Option<String>,
    pub deleted: Option<String>,
}

/// Product row for list and grid views.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub sku: String,
    pub category: String,
    pub price: String,
    pub original_price: Option<String>,
    pub stock: i64,
    pub stock_class: &'static str,
    pub image: Option<String>,
}

/// Badge class for a stock level.
const fn stock_class(level: StockLevel) -> &'static str {
    match level {
        StockLevel::InStock => "stock-high",
        StockLevel::Low => "stock-low",
        StockLevel::Out => "stock-out",
    }
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            price: product.effective_price().to_string(),
            original_price: product.has_discount().then(|| product.price.to_string()),
            stock: product.stock,
            stock_class: stock_class(product.stock_level()),
            image: product.card_image().map(String::from),
        }
    }
}

/// Category filter option.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Gender select option.
#[derive(Debug, Clone)]
pub struct GenderOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Per-field messages for numeric inputs.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    pub price: Option<String>,
    pub discount_price: Option<String>,
    pub stock: Option<String>,
}

impl From<&[DraftError]> for FieldErrors {
    fn from(errors: &[DraftError]) -> Self {
        let mut fields = Self::default();
        for error in errors {
            let message = Some(error.to_string());
            match error {
                DraftError::Price => fields.price = message,
                DraftError::DiscountPrice => fields.discount_price = message,
                DraftError::Stock => fields.stock = message,
            }
        }
        fields
    }
}

/// Whether the form creates a product or edits an existing one.
#[derive(Debug, Clone)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

impl FormMode {
    fn action_url(&self) -> String {
        match self {
            Self::Create => format!("{PRODUCTS_PATH}/create"),
            Self::Edit(id) => format!(
                "{PRODUCTS_PATH}/edit/{}",
                urlencoding::encode(id.as_str())
            ),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub products: Vec<ProductRow>,
    pub stats: InventoryStats,
    pub categories: Vec<CategoryOption>,
    pub search_query: String,
    pub grid: bool,
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
    /// Send the browser to the login page after a short delay.
    pub login_refresh: bool,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub is_edit: bool,
    pub action_url: String,
    pub form: ProductForm,
    pub genders: Vec<GenderOption>,
    pub field_errors: FieldErrors,
    pub error: Option<String>,
    pub success: Option<&'static str>,
    /// Send the browser back to the list after a short delay.
    pub list_refresh: bool,
}

impl ProductFormTemplate {
    fn new(admin: &AdminUserView, mode: &FormMode, form: ProductForm) -> Self {
        let genders = Gender::ALL
            .into_iter()
            .map(|g| GenderOption {
                value: g.as_str(),
                selected: g == form.gender,
            })
            .collect();

        Self {
            admin_user: admin.clone(),
            current_path: PRODUCTS_PATH,
            is_edit: matches!(mode, FormMode::Edit(_)),
            action_url: mode.action_url(),
            form,
            genders,
            field_errors: FieldErrors::default(),
            error: None,
            success: None,
            list_refresh: false,
        }
    }

    fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub id: String,
    pub product: Option<ProductDetail>,
    pub error: Option<&'static str>,
}

/// Read-only product fields.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub row: ProductRow,
    pub description: String,
    pub brand: String,
    pub gender: &'static str,
    pub tags: Vec<String>,
    pub thumbnail: String,
    pub images: Vec<String>,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            row: ProductRow::from(product),
            description: product.description.clone(),
            brand: product.brand.clone(),
            gender: product.gender.as_str(),
            tags: product.tags.clone(),
            thumbnail: product.thumbnail.clone(),
            images: product.images.clone(),
        }
    }
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "products/delete.html")]
pub struct DeleteConfirmTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub id: String,
    pub title: Option<String>,
    pub error: Option<&'static str>,
}

// =============================================================================
// List
// =============================================================================

/// Products list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Response {
    let jar = load_backend_cookie(&session).await.unwrap_or_default();
    let search_query = query.q.unwrap_or_default();
    let category = query.category.filter(|c| !c.trim().is_empty());

    let mut template = ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: PRODUCTS_PATH,
        products: Vec::new(),
        stats: InventoryStats::default(),
        categories: Vec::new(),
        search_query,
        grid: query.view.as_deref() == Some("grid"),
        notice: query.deleted.is_some().then_some("Product deleted."),
        error: None,
        login_refresh: false,
    };

    match state.backend().list_products(&jar).await {
        Ok(products) => {
            template.stats = InventoryStats::from_products(&products);
            template.categories = catalog::categories(&products)
                .into_iter()
                .map(|name| CategoryOption {
                    selected: category.as_deref() == Some(name.as_str()),
                    name,
                })
                .collect();
            template.products =
                catalog::search(&products, &template.search_query, category.as_deref())
                    .into_iter()
                    .map(ProductRow::from)
                    .collect();
        }
        Err(e) => {
            tracing::warn!("Failed to fetch products: {e}");
            template.error = Some(LIST_ERROR);
            template.login_refresh = e.is_auth_failure();
        }
    }

    template.into_response()
}

// =============================================================================
// Create / Edit
// =============================================================================

/// Empty create form.
#[instrument(skip_all)]
pub async fn create_page(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
    ProductFormTemplate::new(
        &AdminUserView::from(&admin),
        &FormMode::Create,
        ProductForm::default(),
    )
}

/// Handle create form submission.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    submit(&state, &session, &AdminUserView::from(&admin), FormMode::Create, pairs).await
}

/// Edit form prefilled from the backend.
#[instrument(skip(admin, state, session))]
pub async fn edit_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let admin_user = AdminUserView::from(&admin);
    let id = ProductId::new(id);
    let jar = load_backend_cookie(&session).await.unwrap_or_default();

    match state.backend().get_product(&id, &jar).await {
        Ok(product) => ProductFormTemplate::new(
            &admin_user,
            &FormMode::Edit(id),
            ProductForm::from_product(product),
        )
        .into_response(),
        Err(e) => {
            tracing::warn!(product_id = %id, "Failed to fetch product: {e}");
            ProductFormTemplate::new(&admin_user, &FormMode::Edit(id), ProductForm::default())
                .with_error(FETCH_ERROR)
                .into_response()
        }
    }
}

/// Handle edit form submission.
#[instrument(skip(admin, state, session, pairs))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let mode = FormMode::Edit(ProductId::new(id));
    submit(&state, &session, &AdminUserView::from(&admin), mode, pairs).await
}

/// Shared create/update flow.
///
/// Image row actions and unparseable numbers re-render without touching the
/// backend. A successful create clears the form; a successful update keeps
/// the saved values. Both schedule a return to the list.
async fn submit(
    state: &AppState,
    session: &Session,
    admin_user: &AdminUserView,
    mode: FormMode,
    pairs: Vec<(String, String)>,
) -> Response {
    let (mut form, action) = ProductForm::from_pairs(pairs);
    if form.apply(action) {
        return ProductFormTemplate::new(admin_user, &mode, form).into_response();
    }

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            let mut template = ProductFormTemplate::new(admin_user, &mode, form);
            template.field_errors = FieldErrors::from(errors.as_slice());
            return template.with_error(FIX_FIELDS).into_response();
        }
    };

    let mut jar = load_backend_cookie(session).await.unwrap_or_default();
    let result: Result<&'static str, BackendError> = match &mode {
        FormMode::Create => state
            .backend()
            .create_product(&draft, &mut jar)
            .await
            .map(|()| "Product created successfully!"),
        FormMode::Edit(id) => state
            .backend()
            .update_product(id, &draft, &mut jar)
            .await
            .map(|()| "Product updated successfully!"),
    };
    if let Err(e) = save_backend_cookie(session, &jar).await {
        tracing::warn!("Failed to store backend cookie: {e}");
    }

    match result {
        Ok(message) => {
            tracing::info!(title = %draft.title, "{message}");
            let form = match &mode {
                FormMode::Create => ProductForm::default(),
                FormMode::Edit(_) => form,
            };
            let mut template = ProductFormTemplate::new(admin_user, &mode, form);
            template.success = Some(message);
            template.list_refresh = true;
            template.into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to save product: {e}");
            let message = e.user_message(SAVE_ERROR).to_string();
            ProductFormTemplate::new(admin_user, &mode, form)
                .with_error(message)
                .into_response()
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// Read-only product page.
#[instrument(skip(admin, state, session))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let jar = load_backend_cookie(&session).await.unwrap_or_default();
    let product_id = ProductId::new(id.clone());

    let (status, product, error) = match state.backend().get_product(&product_id, &jar).await {
        Ok(product) => (StatusCode::OK, Some(ProductDetail::from(&product)), None),
        Err(BackendError::NotFound(_)) => (StatusCode::NOT_FOUND, None, Some(FETCH_ERROR)),
        Err(e) => {
            tracing::warn!(product_id = %product_id, "Failed to fetch product: {e}");
            (StatusCode::OK, None, Some(FETCH_ERROR))
        }
    };

    let template = ProductShowTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: PRODUCTS_PATH,
        id,
        product,
        error,
    };
    (status, template).into_response()
}

// =============================================================================
// Delete
// =============================================================================

/// Delete confirmation page (used when JavaScript is unavailable).
#[instrument(skip(admin, state, session))]
pub async fn delete_confirm(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let jar = load_backend_cookie(&session).await.unwrap_or_default();
    let title = state
        .backend()
        .get_product(&ProductId::new(id.clone()), &jar)
        .await
        .map(|p| p.title)
        .ok();

    DeleteConfirmTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: PRODUCTS_PATH,
        id,
        title,
        error: None,
    }
}

/// Delete a product.
///
/// HTMX requests get an empty 200 so the row is swapped out in place; on
/// failure the message is retargeted into the page's flash area. Plain form
/// posts redirect back to the list.
#[instrument(skip(admin, state, session, headers))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let htmx = headers.contains_key("hx-request");
    let product_id = ProductId::new(id.clone());
    let mut jar = load_backend_cookie(&session).await.unwrap_or_default();

    let result = state.backend().delete_product(&product_id, &mut jar).await;
    if let Err(e) = save_backend_cookie(&session, &jar).await {
        tracing::warn!("Failed to store backend cookie: {e}");
    }

    match result {
        Ok(()) => {
            tracing::info!(product_id = %product_id, admin_id = %admin.id, "Product deleted");
            if htmx {
                StatusCode::OK.into_response()
            } else {
                Redirect::to(&format!("{PRODUCTS_PATH}?deleted=1")).into_response()
            }
        }
        Err(e) => {
            tracing::warn!(product_id = %product_id, "Failed to delete product: {e}");
            if htmx {
                htmx_flash_error(DELETE_ERROR)
            } else {
                DeleteConfirmTemplate {
                    admin_user: AdminUserView::from(&admin),
                    current_path: PRODUCTS_PATH,
                    id,
                    title: None,
                    error: Some(DELETE_ERROR),
                }
                .into_response()
            }
        }
    }
}

/// An error fragment swapped into `#flash` instead of the request's target.
fn htmx_flash_error(message: &'static str) -> Response {
    let mut response =
        Html(format!("<p class=\"alert alert-error\">{message}</p>")).into_response();
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("hx-retarget"),
        HeaderValue::from_static("#flash"),
    );
    headers.insert(
        HeaderName::from_static("hx-reswap"),
        HeaderValue::from_static("innerHTML"),
    );
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(stock: i64) -> Product {
        serde_json::from_value(json!({
            "_id": "p1",
            "title": "Cap",
            "price": 20,
            "discountPrice": 15,
            "stock": stock
        }))
        .unwrap()
    }

    #[test]
    fn test_row_shows_discount_and_stock_band() {
        let row = ProductRow::from(&product(4));
        assert_eq!(row.price, "$15.00");
        assert_eq!(row.original_price.as_deref(), Some("$20.00"));
        assert_eq!(row.stock_class, "stock-low");
        assert_eq!(ProductRow::from(&product(0)).stock_class, "stock-out");
        assert_eq!(ProductRow::from(&product(50)).stock_class, "stock-high");
    }

    #[test]
    fn test_field_errors_map_to_inputs() {
        let errors = FieldErrors::from([DraftError::Stock].as_slice());
        assert!(errors.price.is_none());
        assert_eq!(errors.stock.as_deref(), Some("Stock must be a whole number"));
    }

    #[test]
    fn test_form_mode_urls() {
        assert_eq!(FormMode::Create.action_url(), "/admin/products/create");
        assert_eq!(
            FormMode::Edit(ProductId::new("a b")).action_url(),
            "/admin/products/edit/a%20b"
        );
    }

    #[test]
    fn test_htmx_flash_error_retargets() {
        let response = htmx_flash_error(DELETE_ERROR);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["hx-retarget"], "#flash");
    }
}
