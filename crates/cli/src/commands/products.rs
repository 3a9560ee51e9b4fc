//! `products list`.

use ark_core::Product;
use ark_core::catalog::{InventoryStats, search};
use tracing::info;

use super::CliError;

/// Log one line per matching product, then the inventory stats.
///
/// Stats cover the whole catalog, not just the matches.
///
/// # Errors
///
/// Returns an error if login or the product request fails.
pub async fn list(category: Option<&str>, term: Option<&str>) -> Result<(), CliError> {
    let session = super::connect().await?;
    let products = session.backend.list_products(&session.jar).await?;

    let matches = search(&products, term.unwrap_or_default(), category);
    for product in &matches {
        info!("{}", summary_line(product));
    }

    let stats = InventoryStats::from_products(&products);
    info!(
        matched = matches.len(),
        total = stats.total,
        in_stock = stats.in_stock,
        low_stock = stats.low_stock,
        "Inventory"
    );

    Ok(())
}

fn summary_line(product: &Product) -> String {
    format!(
        "{id}  {sku:<12} {title}  {price}  stock={stock}  [{category}]",
        id = product.id,
        sku = product.sku,
        title = product.title,
        price = product.effective_price(),
        stock = product.stock,
        category = product.category,
    )
}
