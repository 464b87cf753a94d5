//! Cart Aggregate

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::{Money, Quantity, StorageId};

/// One product line. Used both for the live cart and, copied verbatim, for
/// the line list of a placed order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "_id", default = "StorageId::generate")]
    pub id: StorageId,
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub price: Money,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 { 1 }

impl LineItem {
    /// Snapshot of the product's display fields at add time.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: StorageId::generate(), product_id: product.catalog_id.clone(),
            product_name: product.name.clone(), price: product.price,
            rating: product.rating, image: product.image.clone(), quantity,
        }
    }

    pub fn line_total(&self) -> Money { self.price.multiply(self.quantity) }

    /// Lines may have been written under either identifier scheme, so any of
    /// the cross matches counts as the same product.
    pub fn refers_to(&self, product: &Product) -> bool {
        self.product_id == product.catalog_id
            || product.storage_id == *self.product_id.as_str()
            || self.id == product.storage_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartChange {
    Inserted { line_id: StorageId },
    Merged { line_id: StorageId, quantity: u32 },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }
    pub fn from_lines(items: Vec<LineItem>) -> Self { Self { items } }

    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Raw cart total, no discount or delivery fee.
    pub fn total(&self) -> Money { self.items.iter().map(LineItem::line_total).sum() }

    pub fn add_item(&mut self, product: &Product, quantity: u32) -> CartChange {
        if let Some(existing) = self.items.iter_mut().find(|i| i.refers_to(product)) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return CartChange::Merged { line_id: existing.id.clone(), quantity: existing.quantity };
        }
        let line = LineItem::from_product(product, quantity);
        let line_id = line.id.clone();
        self.items.push(line);
        CartChange::Inserted { line_id }
    }

    pub fn update_quantity(&mut self, line_id: &str, quantity: Quantity) -> Result<(), CartError> {
        let item = self.items.iter_mut().find(|i| i.id == *line_id).ok_or(CartError::LineNotFound)?;
        item.quantity = quantity.value();
        Ok(())
    }

    /// Drops every line whose line id or product id equals `line_ref`.
    /// Returns how many lines went away; zero is not an error.
    pub fn remove_item(&mut self, line_ref: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.id != *line_ref && i.product_id != line_ref);
        before - self.items.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Cart item not found")]
    LineNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(catalog_id: &str, price_cents: i64) -> Product {
        Product::create(catalog_id, "Widget", Money::cents(price_cents))
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new();
        let widget = product("P1", 1000);
        cart.add_item(&widget, 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Money::cents(2000));
        cart.add_item(&widget, 1);
        assert_eq!(cart.items()[0].quantity, 3); // Merged
        assert_eq!(cart.total(), Money::cents(3000));
    }

    #[test]
    fn test_merge_across_identifier_schemes() {
        let widget = product("P1", 1000);
        let mut legacy = LineItem::from_product(&widget, 1);
        legacy.product_id = widget.storage_id.to_string();
        let mut cart = Cart::from_lines(vec![legacy]);

        let change = cart.add_item(&widget, 4);
        assert!(matches!(change, CartChange::Merged { quantity: 5, .. }));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_distinct_products_get_distinct_lines() {
        let mut cart = Cart::new();
        cart.add_item(&product("P1", 1000), 1);
        cart.add_item(&product("P2", 500), 1);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), Money::cents(1500));
    }

    #[test]
    fn test_remove_by_line_id_or_product_id() {
        let mut cart = Cart::new();
        let a = product("P1", 1000);
        let b = product("P2", 500);
        cart.add_item(&a, 1);
        cart.add_item(&b, 1);
        let line_id = cart.items()[0].id.to_string();

        assert_eq!(cart.remove_item(&line_id), 1);
        assert_eq!(cart.remove_item("P2"), 1);
        assert!(cart.is_empty());
        assert_eq!(cart.remove_item("P2"), 0);
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_item(&product("P1", 1000), 5);
        let line_id = cart.items()[0].id.to_string();
        cart.update_quantity(&line_id, Quantity::new(2).unwrap()).unwrap();
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.update_quantity("missing", Quantity::default()), Err(CartError::LineNotFound));
    }

    #[test]
    fn test_client_line_defaults() {
        let line: LineItem = serde_json::from_str(r#"{"product_id":"P9","price":12.5}"#).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.price, Money::cents(1250));
        assert!(StorageId::is_well_formed(line.id.as_str()));
    }
}
