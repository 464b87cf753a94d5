//! User Aggregate
//!
//! The user owns its addresses, cart and order history. Every mutation goes
//! through a method here, and the persisted copy is replaced as a whole under
//! a version check (see `storage::UserStore::save`).

use chrono::{DateTime, Utc};

use crate::domain::aggregates::address::{Address, AddressPatch};
use crate::domain::aggregates::cart::{Cart, CartChange, CartError};
use crate::domain::aggregates::order::{Order, OrderError};
use crate::domain::aggregates::{LineItem, Product};
use crate::domain::events::{CartEvent, DomainEvent, OrderEvent};
use crate::domain::value_objects::Quantity;

#[derive(Clone, Debug)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub addresses: Vec<Address>,
    pub cart: Cart,
    pub orders: Vec<Order>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

/// Profile edit; absent or empty fields are left alone.
#[derive(Clone, Debug, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email, &self.phone]
            .iter()
            .all(|f| f.as_deref().map_or(true, str::is_empty))
    }
}

impl User {
    pub fn register(
        user_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: &str,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(), first_name: first_name.into(), last_name: last_name.into(),
            email: email.to_lowercase(), phone: phone.into(), password_hash: password_hash.into(),
            token: None, refresh_token: None, addresses: vec![], cart: Cart::new(), orders: vec![],
            version: 0, created_at: now, updated_at: now, events: vec![],
        }
    }

    /// Rebuilds an aggregate loaded from storage; carries no pending events.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        user_id: String, first_name: String, last_name: String, email: String, phone: String,
        password_hash: String, token: Option<String>, refresh_token: Option<String>,
        addresses: Vec<Address>, cart: Cart, orders: Vec<Order>, version: i64,
        created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id, first_name, last_name, email, phone, password_hash, token, refresh_token,
            addresses, cart, orders, version, created_at, updated_at, events: vec![],
        }
    }

    pub fn display_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }

    pub fn set_tokens(&mut self, token: String, refresh_token: String) {
        self.token = Some(token);
        self.refresh_token = Some(refresh_token);
        self.touch();
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) {
        let keep = |v: Option<String>| v.filter(|v| !v.is_empty());
        if let Some(v) = keep(patch.first_name) { self.first_name = v; }
        if let Some(v) = keep(patch.last_name) { self.last_name = v; }
        if let Some(v) = keep(patch.email) { self.email = v.to_lowercase(); }
        if let Some(v) = keep(patch.phone) { self.phone = v; }
        self.touch();
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> CartChange {
        let change = self.cart.add_item(product, quantity);
        let event = match &change {
            CartChange::Inserted { line_id } => CartEvent::LineAdded {
                line_id: line_id.clone(), product_id: product.catalog_id.clone(), quantity,
            },
            CartChange::Merged { line_id, quantity } => CartEvent::LineMerged { line_id: line_id.clone(), quantity: *quantity },
        };
        self.raise_event(DomainEvent::Cart(event));
        self.touch();
        change
    }

    pub fn remove_from_cart(&mut self, line_ref: &str) -> usize {
        let removed = self.cart.remove_item(line_ref);
        if removed > 0 {
            self.raise_event(DomainEvent::Cart(CartEvent::LinesRemoved { line_ref: line_ref.to_string(), removed }));
            self.touch();
        }
        removed
    }

    pub fn update_cart_quantity(&mut self, line_id: &str, quantity: Quantity) -> Result<(), CartError> {
        self.cart.update_quantity(line_id, quantity)?;
        self.raise_event(DomainEvent::Cart(CartEvent::QuantitySet { line_id: line_id.into(), quantity: quantity.value() }));
        self.touch();
        Ok(())
    }

    pub fn clear_cart(&mut self) -> usize {
        let removed = self.cart.clear();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared { removed }));
        self.touch();
        removed
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Turns the given lines (or the stored cart when `explicit` is `None`)
    /// into an order, appends it and empties the cart. On error nothing
    /// about the aggregate changes.
    pub fn place_order(&mut self, explicit: Option<Vec<LineItem>>, now: DateTime<Utc>) -> Result<Order, OrderError> {
        let lines = explicit.unwrap_or_else(|| self.cart.items().to_vec());
        let order = Order::place(lines, now)?;
        self.orders.push(order.clone());
        self.cart.clear();
        self.raise_event(DomainEvent::Order(OrderEvent::Placed {
            order_id: order.id().clone(), total: order.pricing().total, items: order.item_count(),
        }));
        self.touch();
        Ok(order)
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| *o.id() == *order_id)
    }

    // -------------------------------------------------------------------------
    // Addresses
    // -------------------------------------------------------------------------

    pub fn add_address(&mut self, address: Address) {
        self.addresses.push(address);
        self.touch();
    }

    pub fn update_address(&mut self, address_id: &str, patch: AddressPatch) -> Option<&Address> {
        let index = self.addresses.iter().position(|a| a.id == *address_id)?;
        patch.apply(&mut self.addresses[index]);
        self.touch();
        self.addresses.get(index)
    }

    pub fn remove_address(&mut self, address_id: &str) -> usize {
        let before = self.addresses.len();
        self.addresses.retain(|a| a.id != *address_id);
        self.touch();
        before - self.addresses.len()
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;

    fn user() -> User {
        User::register("u1", "Ada", "Lovelace", "Ada@Example.com", "555-0100", "hash")
    }

    #[test]
    fn test_register_lowercases_email() {
        assert_eq!(user().email, "ada@example.com");
    }

    #[test]
    fn test_checkout_moves_cart_into_orders() {
        let mut u = user();
        let product = Product::create("A", "Headphones", Money::cents(10000));
        u.add_to_cart(&product, 1);

        let order = u.place_order(None, Utc::now()).unwrap();
        assert!(u.cart.is_empty());
        assert_eq!(u.orders.len(), 1);
        assert_eq!(order.pricing().total, Money::cents(9500));
        assert_eq!(u.order(order.id().as_str()), Some(&order));

        let events = u.take_events();
        assert!(matches!(events.last(), Some(DomainEvent::Order(OrderEvent::Placed { items: 1, .. }))));
    }

    #[test]
    fn test_explicit_lines_still_clear_cart() {
        let mut u = user();
        u.add_to_cart(&Product::create("A", "Headphones", Money::cents(10000)), 2);
        let explicit = vec![LineItem::from_product(&Product::create("B", "Mouse", Money::cents(8900)), 1)];

        let order = u.place_order(Some(explicit), Utc::now()).unwrap();
        assert_eq!(order.items()[0].product_id, "B");
        assert!(u.cart.is_empty());
    }

    #[test]
    fn test_failed_checkout_leaves_aggregate_alone() {
        let mut u = user();
        u.add_to_cart(&Product::create("A", "Headphones", Money::cents(10000)), 1);
        assert_eq!(u.place_order(Some(vec![]), Utc::now()), Err(OrderError::NoItems));
        assert_eq!(u.cart.len(), 1);
        assert!(u.orders.is_empty());
    }

    #[test]
    fn test_profile_patch_emptiness() {
        assert!(ProfilePatch::default().is_empty());
        assert!(ProfilePatch { phone: Some(String::new()), ..Default::default() }.is_empty());
        assert!(!ProfilePatch { phone: Some("1".into()), ..Default::default() }.is_empty());
    }
}
