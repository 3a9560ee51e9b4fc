//! Session-held shopping cart.
//!
//! Lines keep a snapshot of the product taken when it was added, so the cart
//! page renders without a backend round trip. Each change replaces the whole
//! cart in the session.

use ark_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a cart change is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("{0} is out of stock")]
    OutOfStock(String),
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.effective_price().times(self.quantity)
    }
}

/// The shopper's cart, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// Largest quantity the product's stock allows.
fn stock_limit(product: &Product) -> u32 {
    u32::try_from(product.stock.max(1)).unwrap_or(u32::MAX)
}

impl Cart {
    /// Add `quantity` units, merging with an existing line.
    ///
    /// The line's snapshot is refreshed and its quantity clamped to stock.
    /// Returns the resulting line quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` if the product has no stock.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<u32, CartError> {
        if !product.is_in_stock() {
            return Err(CartError::OutOfStock(product.title));
        }

        let limit = stock_limit(&product);
        let quantity = quantity.max(1);

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity).clamp(1, limit);
            line.product = product;
            return Ok(line.quantity);
        }

        let quantity = quantity.clamp(1, limit);
        self.lines.push(CartLine { product, quantity });
        Ok(quantity)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }
        match self.lines.iter_mut().find(|l| &l.product.id == id) {
            Some(line) => {
                line.quantity = quantity.clamp(1, stock_limit(&line.product));
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product.id != id);
        self.lines.len() != before
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across lines, shown on the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of line totals at effective prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}
