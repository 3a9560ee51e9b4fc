//! Product create/edit form state.
//!
//! The form is posted as ordered key/value pairs because `images` repeats.
//! Buttons post an `action` field: `save`, `add_image` or `remove_image:<n>`.
//! Adding and removing image rows is a form round-trip that never reaches
//! the backend.

use std::str::FromStr;

use ark_core::{Gender, Price, Product, ProductDraft};
use rust_decimal::Decimal;
use thiserror::Error;

/// A field that could not be converted into a draft value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Price must be a number")]
    Price,
    #[error("Discount price must be a number")]
    DiscountPrice,
    #[error("Stock must be a whole number")]
    Stock,
}

impl DraftError {
    /// Form field the message belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::DiscountPrice => "discount_price",
            Self::Stock => "stock",
        }
    }
}

/// What the submitting button asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Save,
    AddImage,
    RemoveImage(usize),
}

impl FormAction {
    fn parse(value: &str) -> Self {
        match value {
            "add_image" => Self::AddImage,
            other => other
                .strip_prefix("remove_image:")
                .and_then(|n| n.parse().ok())
                .map_or(Self::Save, Self::RemoveImage),
        }
    }
}

/// Raw form values, kept as typed so they can be re-rendered unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub discount_price: String,
    pub stock: String,
    pub sku: String,
    pub brand: String,
    pub category: String,
    pub gender: Gender,
    pub tags: String,
    pub thumbnail: String,
    pub images: Vec<String>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            discount_price: String::new(),
            stock: String::new(),
            sku: String::new(),
            brand: String::new(),
            category: String::new(),
            gender: Gender::Unisex,
            tags: String::new(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }
}

impl ProductForm {
    /// Read posted pairs. Unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> (Self, FormAction) {
        let mut form = Self::default();
        let mut action = FormAction::Save;

        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value,
                "description" => form.description = value,
                "price" => form.price = value,
                "discount_price" => form.discount_price = value,
                "stock" => form.stock = value,
                "sku" => form.sku = value,
                "brand" => form.brand = value,
                "category" => form.category = value,
                "gender" => form.gender = Gender::from_form(&value),
                "tags" => form.tags = value,
                "thumbnail" => form.thumbnail = value,
                "images" => form.images.push(value),
                "action" => action = FormAction::parse(&value),
                _ => {}
            }
        }

        (form, action)
    }

    /// Prefill from a stored product. Tags are joined with `", "`.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            title: product.title,
            description: product.description,
            price: product.price.amount().normalize().to_string(),
            discount_price: product
                .discount_price
                .map(|d| d.amount().normalize().to_string())
                .unwrap_or_default(),
            stock: product.stock.to_string(),
            sku: product.sku,
            brand: product.brand,
            category: product.category,
            gender: product.gender,
            tags: product.tags.join(", "),
            thumbnail: product.thumbnail,
            images: product.images,
        }
    }

    /// Apply an image row action. Returns `false` for `Save`.
    pub fn apply(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::Save => false,
            FormAction::AddImage => {
                self.images.push(String::new());
                true
            }
            FormAction::RemoveImage(index) => {
                if index < self.images.len() {
                    self.images.remove(index);
                }
                true
            }
        }
    }

    /// Tags split on commas, trimmed, empties dropped.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Convert into the backend payload.
    ///
    /// # Errors
    ///
    /// Returns every numeric field that failed to parse.
    pub fn to_draft(&self) -> Result<ProductDraft, Vec<DraftError>> {
        let mut errors = Vec::new();

        let price = parse_field::<Decimal>(&self.price, DraftError::Price, &mut errors);
        let discount_price = if self.discount_price.trim().is_empty() {
            None
        } else {
            parse_field::<Decimal>(&self.discount_price, DraftError::DiscountPrice, &mut errors)
                .map(Price::new)
        };
        let stock = parse_field::<i64>(&self.stock, DraftError::Stock, &mut errors);

        let (Some(price), Some(stock), true) = (price, stock, errors.is_empty()) else {
            return Err(errors);
        };

        Ok(ProductDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            price: Price::new(price),
            discount_price,
            stock,
            sku: self.sku.trim().to_string(),
            brand: self.brand.trim().to_string(),
            category: self.category.trim().to_string(),
            gender: self.gender,
            tags: self.tag_list(),
            thumbnail: self.thumbnail.trim().to_string(),
            images: self
                .images
                .iter()
                .map(|i| i.trim())
                .filter(|i| !i.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

fn parse_field<T: FromStr>(
    value: &str,
    error: DraftError,
    errors: &mut Vec<DraftError>,
) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        errors.push(error);
    }
    parsed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn filled() -> ProductForm {
        let (form, _) = ProductForm::from_pairs(pairs(&[
            ("title", " Linen Shirt "),
            ("price", "59.99"),
            ("discount_price", ""),
            ("stock", "12"),
            ("sku", "LS-001"),
            ("gender", "men"),
            ("tags", "summer, ,linen ,"),
            ("images", "https://cdn.example.com/1.jpg"),
            ("images", "  "),
            ("images", "https://cdn.example.com/2.jpg"),
        ]));
        form
    }

    #[test]
    fn test_to_draft_converts_fields() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.title, "Linen Shirt");
        assert_eq!(draft.price.to_string(), "$59.99");
        assert_eq!(draft.discount_price, None);
        assert_eq!(draft.stock, 12);
        assert_eq!(draft.gender, Gender::Men);
        assert_eq!(draft.tags, vec!["summer", "linen"]);
        assert_eq!(
            draft.images,
            vec!["https://cdn.example.com/1.jpg", "https://cdn.example.com/2.jpg"]
        );
    }

    #[test]
    fn test_to_draft_reports_every_bad_number() {
        let mut form = filled();
        form.price = "abc".to_string();
        form.discount_price = "ten".to_string();
        form.stock = "3.5".to_string();

        let errors = form.to_draft().unwrap_err();
        assert_eq!(
            errors,
            vec![DraftError::Price, DraftError::DiscountPrice, DraftError::Stock]
        );
        assert_eq!(errors[1].field(), "discount_price");
    }

    #[test]
    fn test_bad_discount_alone_is_rejected() {
        let mut form = filled();
        form.discount_price = "cheap".to_string();
        assert_eq!(form.to_draft().unwrap_err(), vec![DraftError::DiscountPrice]);
    }

    #[test]
    fn test_image_actions() {
        let (mut form, action) = ProductForm::from_pairs(pairs(&[
            ("images", "a"),
            ("images", "b"),
            ("action", "remove_image:0"),
        ]));
        assert_eq!(action, FormAction::RemoveImage(0));
        assert!(form.apply(action));
        assert_eq!(form.images, vec!["b"]);

        assert!(form.apply(FormAction::AddImage));
        assert_eq!(form.images, vec!["b", ""]);

        assert!(form.apply(FormAction::RemoveImage(9)));
        assert_eq!(form.images.len(), 2);
        assert!(!form.apply(FormAction::Save));
    }

    #[test]
    fn test_unknown_action_saves() {
        let (_, action) = ProductForm::from_pairs(pairs(&[("action", "publish")]));
        assert_eq!(action, FormAction::Save);
    }

    #[test]
    fn test_from_product_joins_tags() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Cap",
            "price": 12.5,
            "discountPrice": 10,
            "stock": 3,
            "tags": ["summer", "linen"]
        }))
        .unwrap();

        let form = ProductForm::from_product(product);
        assert_eq!(form.tags, "summer, linen");
        assert_eq!(form.price, "12.5");
        assert_eq!(form.discount_price, "10");
        assert_eq!(form.stock, "3");
        assert_eq!(form.gender, Gender::Unisex);
    }
}
