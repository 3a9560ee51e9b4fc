//! Session-held wishlist: saved products in the order they were added.

use ark_core::{Product, ProductId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == id)
    }

    /// Save a product unless it is already present.
    pub fn add(&mut self, product: Product) {
        if !self.contains(&product.id) {
            self.items.push(product);
        }
    }

    /// Take a product out, returning its snapshot.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.items.iter().position(|p| &p.id == id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: &str) -> Product {
        serde_json::from_value(json!({ "_id": id, "title": id, "price": 1 })).unwrap()
    }

    #[test]
    fn test_add_ignores_duplicates_and_keeps_order() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product("b"));
        wishlist.add(product("a"));
        wishlist.add(product("b"));

        let ids: Vec<&str> = wishlist.items().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_returns_snapshot() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product("a"));

        let removed = wishlist.remove(&ProductId::new("a")).unwrap();
        assert_eq!(removed.title, "a");
        assert!(wishlist.is_empty());
        assert!(wishlist.remove(&ProductId::new("a")).is_none());
    }
}
