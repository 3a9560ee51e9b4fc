//! In-memory catalog queries.
//!
//! Pages load the full product list once and narrow it here. There is no
//! server-side search; these helpers only filter what was already fetched.

use crate::types::{Gender, Product};

/// Products whose title or SKU contains `term` (case-insensitive) and whose
/// category equals `category` when one is given.
///
/// Blank terms and blank categories do not filter.
#[must_use]
pub fn search<'a>(
    products: &'a [Product],
    term: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.sku.to_lowercase().contains(&needle)
        })
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}

/// Distinct non-empty categories in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !product.category.is_empty() && !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// Products listed under a storefront department.
///
/// Men and Women also show unisex items; Kids only shows kids' items.
#[must_use]
pub fn for_department(products: &[Product], department: Gender) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| match department {
            Gender::Men | Gender::Women => p.gender == department || p.gender == Gender::Unisex,
            Gender::Kids | Gender::Unisex => p.gender == department,
        })
        .collect()
}

/// Inventory counters shown above the admin product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub total: usize,
    pub in_stock: usize,
    pub low_stock: usize,
}

impl InventoryStats {
    /// Count products by stock band.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut stats, p| {
            stats.total += 1;
            if p.is_in_stock() {
                stats.in_stock += 1;
                if p.stock <= Product::LOW_STOCK_THRESHOLD {
                    stats.low_stock += 1;
                }
            }
            stats
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(
        id: &str,
        title: &str,
        sku: &str,
        category: &str,
        gender: &str,
        stock: i64,
    ) -> Product {
        serde_json::from_value(json!({
            "_id": id,
            "title": title,
            "SKU": sku,
            "category": category,
            "gender": gender,
            "stock": stock,
            "price": 10
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Denim Jacket", "DJ-01", "Outerwear", "Men", 12),
            product("2", "Summer Dress", "SD-02", "Dresses", "Women", 3),
            product("3", "Rain Coat", "RC-03", "Outerwear", "Unisex", 0),
            product("4", "Dino Tee", "KT-04", "", "Kids", 10),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_search_matches_title_or_sku_case_insensitive() {
        let products = catalog();
        assert_eq!(ids(&search(&products, "JACKET", None)), ["1"]);
        assert_eq!(ids(&search(&products, "sd-0", None)), ["2"]);
        assert_eq!(search(&products, "  ", None).len(), 4);
    }

    #[test]
    fn test_search_ignores_brand_and_tags() {
        let products: Vec<Product> = serde_json::from_value(json!([{
            "_id": "1", "title": "Parka", "SKU": "PK-1", "price": 10,
            "brand": "Northwind", "tags": ["winter"]
        }]))
        .unwrap();
        assert!(search(&products, "northwind", None).is_empty());
        assert!(search(&products, "winter", None).is_empty());
    }

    #[test]
    fn test_search_combines_term_and_category() {
        let products = catalog();
        assert_eq!(ids(&search(&products, "", Some("Outerwear"))), ["1", "3"]);
        assert_eq!(ids(&search(&products, "coat", Some("Outerwear"))), ["3"]);
        assert!(search(&products, "coat", Some("Dresses")).is_empty());
        assert_eq!(search(&products, "", Some("")).len(), 4);
    }

    #[test]
    fn test_categories_unique_in_order() {
        assert_eq!(categories(&catalog()), ["Outerwear", "Dresses"]);
    }

    #[test]
    fn test_departments() {
        let products = catalog();
        assert_eq!(ids(&for_department(&products, Gender::Men)), ["1", "3"]);
        assert_eq!(ids(&for_department(&products, Gender::Women)), ["2", "3"]);
        assert_eq!(ids(&for_department(&products, Gender::Kids)), ["4"]);
    }

    #[test]
    fn test_inventory_stats() {
        let stats = InventoryStats::from_products(&catalog());
        assert_eq!(
            stats,
            InventoryStats {
                total: 4,
                in_stock: 3,
                low_stock: 2,
            }
        );
    }
}
