//! Product records mirrored from the backend catalog.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Department a product is merchandised under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Kids,
    /// Unknown backend values are read as `Unisex`.
    #[default]
    #[serde(other)]
    Unisex,
}

impl Gender {
    /// All departments in display order.
    pub const ALL: [Self; 4] = [Self::Men, Self::Women, Self::Kids, Self::Unisex];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Kids => "Kids",
            Self::Unisex => "Unisex",
        }
    }

    /// Parse a form value; anything unrecognised is `Unisex`.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock band used for badges and inventory stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// More than [`Product::LOW_STOCK_THRESHOLD`] units.
    InStock,
    /// Between 1 and [`Product::LOW_STOCK_THRESHOLD`] units.
    Low,
    /// Zero or negative stock.
    Out,
}

/// A catalog item as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "SKU", default)]
    pub sku: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Stock at or below this count (and above zero) is "low".
    pub const LOW_STOCK_THRESHOLD: i64 = 10;

    /// Whether a discount price below the list price is set.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_price.is_some_and(|d| d < self.price)
    }

    /// The price a shopper pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Stock band for this product.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        if self.stock > Self::LOW_STOCK_THRESHOLD {
            StockLevel::InStock
        } else if self.stock > 0 {
            StockLevel::Low
        } else {
            StockLevel::Out
        }
    }

    /// Image shown on cards: the thumbnail, else the first gallery image.
    #[must_use]
    pub fn card_image(&self) -> Option<&str> {
        if self.thumbnail.is_empty() {
            self.images.iter().map(String::as_str).find(|s| !s.is_empty())
        } else {
            Some(&self.thumbnail)
        }
    }
}

/// Create/update payload for a product.
///
/// Same shape as [`Product`] without the backend-assigned `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "SKU", default)]
    pub sku: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            title: product.title,
            description: product.description,
            price: product.price,
            discount_price: product.discount_price,
            stock: product.stock,
            sku: product.sku,
            brand: product.brand,
            category: product.category,
            gender: product.gender,
            tags: product.tags,
            thumbnail: product.thumbnail,
            images: product.images,
        }
    }
}
