//! Use cases over the user aggregate and the catalog.

use crate::domain::aggregates::User;
use crate::domain::events::{CartEvent, DomainEvent, OrderEvent};
use crate::storage::{StoreError, UserStore};
use crate::{CommerceError, Result};

pub mod address;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod identity;
pub mod orders;

pub use address::AddressBook;
pub use cart::{CartService, CartView};
pub use catalog::{resolve_product, seed_demo_catalog, CatalogService};
pub use checkout::{CheckoutService, Receipt};
pub use identity::{Identity, SessionClaims, SessionIssuer, TokenPair};
pub use orders::OrderHistory;

const MAX_WRITE_ATTEMPTS: usize = 5;

/// Load, mutate and compare-and-swap the user aggregate. On a version
/// conflict the closure runs again against a fresh copy, so it must derive
/// everything from the `User` it is handed.
pub(crate) async fn modify_user<T, F>(store: &dyn UserStore, user_id: &str, mut apply: F) -> Result<(T, Vec<DomainEvent>)>
where
    F: FnMut(&mut User) -> Result<T> + Send,
    T: Send,
{
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let mut user = store.find(user_id).await?.ok_or(CommerceError::UserNotFound)?;
        let outcome = apply(&mut user)?;
        match store.save(&user).await {
            Ok(()) => return Ok((outcome, user.take_events())),
            Err(StoreError::VersionConflict) => {
                tracing::debug!(user_id, attempt, "version conflict, reloading aggregate");
            }
            Err(e) => return Err(e.into()),
        }
    }
    tracing::warn!(user_id, attempts = MAX_WRITE_ATTEMPTS, "gave up after repeated version conflicts");
    Err(StoreError::VersionConflict.into())
}

pub(crate) async fn load_user(store: &dyn UserStore, user_id: &str) -> Result<User> {
    store.find(user_id).await?.ok_or(CommerceError::UserNotFound)
}

pub(crate) fn record_events(user_id: &str, events: &[DomainEvent]) {
    for event in events {
        match event {
            DomainEvent::Cart(CartEvent::LineAdded { line_id, product_id, quantity }) => {
                tracing::info!(user_id, %line_id, %product_id, quantity, "cart line added");
            }
            DomainEvent::Cart(CartEvent::LineMerged { line_id, quantity }) => {
                tracing::info!(user_id, %line_id, quantity, "cart line merged");
            }
            DomainEvent::Cart(CartEvent::LinesRemoved { line_ref, removed }) => {
                tracing::info!(user_id, %line_ref, removed, "cart lines removed");
            }
            DomainEvent::Cart(CartEvent::QuantitySet { line_id, quantity }) => {
                tracing::info!(user_id, %line_id, quantity, "cart quantity set");
            }
            DomainEvent::Cart(CartEvent::Cleared { removed }) => {
                tracing::info!(user_id, removed, "cart cleared");
            }
            DomainEvent::Order(OrderEvent::Placed { order_id, total, items }) => {
                tracing::info!(user_id, %order_id, %total, items, "order placed");
            }
        }
    }
}
