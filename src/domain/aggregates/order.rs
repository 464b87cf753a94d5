//! Order Aggregate
//!
//! Orders are frozen snapshots: the line list is a copy taken at checkout,
//! so later catalog edits never reach a placed order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::LineItem;
use crate::domain::pricing::PriceBreakdown;
use crate::domain::value_objects::StorageId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    id: StorageId,
    order_list: Vec<LineItem>,
    ordered_on: DateTime<Utc>,
    #[serde(flatten)]
    pricing: PriceBreakdown,
    payment_method: PaymentMethod,
    status: OrderStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod { pub digital: bool, pub cod: bool }

impl PaymentMethod {
    pub fn cash_on_delivery() -> Self { Self { digital: false, cod: true } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Completed }

impl Order {
    pub fn place(lines: Vec<LineItem>, ordered_on: DateTime<Utc>) -> Result<Self, OrderError> {
        if lines.is_empty() { return Err(OrderError::NoItems); }
        let pricing = PriceBreakdown::for_lines(&lines).ok_or(OrderError::AmountOutOfRange)?;
        Ok(Self {
            id: StorageId::generate(), order_list: lines, ordered_on, pricing,
            payment_method: PaymentMethod::cash_on_delivery(), status: OrderStatus::Completed,
        })
    }

    pub fn id(&self) -> &StorageId { &self.id }
    pub fn items(&self) -> &[LineItem] { &self.order_list }
    pub fn item_count(&self) -> usize { self.order_list.len() }
    pub fn ordered_on(&self) -> DateTime<Utc> { self.ordered_on }
    pub fn pricing(&self) -> &PriceBreakdown { &self.pricing }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn status(&self) -> OrderStatus { self.status }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Cart is empty")]
    NoItems,
    #[error("Amount out of range")]
    AmountOutOfRange,
}
