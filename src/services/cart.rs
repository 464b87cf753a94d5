use serde::Serialize;
use std::sync::Arc;

use super::{load_user, modify_user, record_events, resolve_product};
use crate::domain::aggregates::{CartChange, LineItem};
use crate::domain::value_objects::{Money, Quantity};
use crate::storage::{Catalog, UserStore};
use crate::Result;

/// Raw cart contents; no discount or delivery applied.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total: Money,
}

#[derive(Clone)]
pub struct CartService {
    users: Arc<dyn UserStore>,
    catalog: Arc<dyn Catalog>,
}

impl CartService {
    pub fn new(users: Arc<dyn UserStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { users, catalog }
    }

    /// Adds `quantity` (default 1) of the referenced product, merging into an
    /// existing line for the same product.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(&self, user_id: &str, product_ref: &str, quantity: Option<i64>) -> Result<CartChange> {
        let quantity = Quantity::new(quantity.unwrap_or(1))?;
        let product = resolve_product(self.catalog.as_ref(), product_ref).await?;
        let (change, events) =
            modify_user(self.users.as_ref(), user_id, |user| Ok(user.add_to_cart(&product, quantity.value()))).await?;
        record_events(user_id, &events);
        Ok(change)
    }

    /// Removes lines whose id or product id equals `line_ref`. Missing lines are not an error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, user_id: &str, line_ref: &str) -> Result<usize> {
        let (removed, events) =
            modify_user(self.users.as_ref(), user_id, |user| Ok(user.remove_from_cart(line_ref))).await?;
        record_events(user_id, &events);
        Ok(removed)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_quantity(&self, user_id: &str, line_id: &str, quantity: i64) -> Result<()> {
        let quantity = Quantity::new(quantity)?;
        let ((), events) = modify_user(self.users.as_ref(), user_id, |user| {
            Ok(user.update_cart_quantity(line_id, quantity)?)
        })
        .await?;
        record_events(user_id, &events);
        Ok(())
    }

    pub async fn get_cart(&self, user_id: &str) -> Result<CartView> {
        let user = load_user(self.users.as_ref(), user_id).await?;
        Ok(CartView { total: user.cart.total(), items: user.cart.items().to_vec() })
    }

    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: &str) -> Result<usize> {
        let (removed, events) = modify_user(self.users.as_ref(), user_id, |user| Ok(user.clear_cart())).await?;
        record_events(user_id, &events);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Product, User};
    use crate::storage::MemoryStore;
    use crate::CommerceError;

    async fn setup() -> (CartService, Product) {
        let store = Arc::new(MemoryStore::new());
        store.insert(&User::register("u1", "Ada", "Lovelace", "ada@example.com", "555", "h")).await.unwrap();
        let product = Product::create("product_1_abc", "Widget", Money::cents(2500));
        store.upsert(&product).await.unwrap();
        (CartService::new(store.clone(), store), product)
    }

    #[tokio::test]
    async fn test_add_with_either_identifier_merges() {
        let (cart, product) = setup().await;
        cart.add_item("u1", &product.catalog_id, None).await.unwrap();
        let change = cart.add_item("u1", product.storage_id.as_str(), Some(2)).await.unwrap();
        assert!(matches!(change, CartChange::Merged { quantity: 3, .. }));

        let view = cart.get_cart("u1").await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total, Money::cents(7500));
    }

    #[tokio::test]
    async fn test_rejects_bad_quantity_and_unknown_product() {
        let (cart, product) = setup().await;
        assert!(matches!(cart.add_item("u1", &product.catalog_id, Some(0)).await, Err(CommerceError::InvalidQuantity)));
        assert!(matches!(cart.add_item("u1", "nope", None).await, Err(CommerceError::ProductNotFound)));
        assert!(matches!(cart.add_item("ghost", &product.catalog_id, None).await, Err(CommerceError::UserNotFound)));
        assert!(cart.get_cart("u1").await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_floor_leaves_cart_unchanged() {
        let (cart, product) = setup().await;
        cart.add_item("u1", &product.catalog_id, Some(2)).await.unwrap();
        let line_id = cart.get_cart("u1").await.unwrap().items[0].id.to_string();

        assert!(matches!(cart.update_quantity("u1", &line_id, 0).await, Err(CommerceError::InvalidQuantity)));
        let too_many = i64::from(u32::MAX) + 1;
        assert!(matches!(cart.update_quantity("u1", &line_id, too_many).await, Err(CommerceError::QuantityTooLarge)));
        assert!(matches!(cart.update_quantity("u1", "missing", 3).await, Err(CommerceError::LineNotFound)));
        assert_eq!(cart.get_cart("u1").await.unwrap().items[0].quantity, 2);

        cart.update_quantity("u1", &line_id, 5).await.unwrap();
        assert_eq!(cart.get_cart("u1").await.unwrap().items[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_remove_and_clear_are_idempotent() {
        let (cart, product) = setup().await;
        cart.add_item("u1", &product.catalog_id, None).await.unwrap();
        assert_eq!(cart.remove_item("u1", &product.catalog_id).await.unwrap(), 1);
        assert_eq!(cart.remove_item("u1", &product.catalog_id).await.unwrap(), 0);
        assert_eq!(cart.clear_cart("u1").await.unwrap(), 0);
    }
}
