//! Domain events
use crate::domain::value_objects::{Money, StorageId};

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    LineAdded { line_id: StorageId, product_id: String, quantity: u32 },
    LineMerged { line_id: StorageId, quantity: u32 },
    LinesRemoved { line_ref: String, removed: usize },
    QuantitySet { line_id: StorageId, quantity: u32 },
    Cleared { removed: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Placed { order_id: StorageId, total: Money, items: usize },
}
