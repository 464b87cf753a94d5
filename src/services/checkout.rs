//! Checkout: cart (or caller-supplied lines) into an order, then a
//! best-effort confirmation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::{modify_user, record_events};
use crate::domain::aggregates::{LineItem, Order};
use crate::domain::value_objects::{Money, StorageId};
use crate::notify::{Notifier, OrderConfirmation};
use crate::storage::UserStore;
use crate::Result;

/// Caller-facing summary of a placed order, derived only from the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub subtotal: Money,
    pub discount: Money,
    #[serde(rename = "discountRate")]
    pub discount_rate: Decimal,
    #[serde(rename = "deliveryRate")]
    pub delivery_rate: Money,
    #[serde(rename = "deliveryFee")]
    pub delivery_fee: Money,
    pub total: Money,
    pub timestamp: DateTime<Utc>,
    pub order_id: StorageId,
    pub items: usize,
}

impl From<&Order> for Receipt {
    fn from(order: &Order) -> Self {
        let pricing = order.pricing();
        Self {
            subtotal: pricing.subtotal,
            discount: pricing.discount,
            discount_rate: pricing.discount_rate,
            delivery_rate: pricing.delivery_fee,
            delivery_fee: pricing.delivery_fee,
            total: pricing.total,
            timestamp: order.ordered_on(),
            order_id: order.id().clone(),
            items: order.item_count(),
        }
    }
}

#[derive(Clone)]
pub struct CheckoutService {
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl CheckoutService {
    pub fn new(users: Arc<dyn UserStore>, notifier: Arc<dyn Notifier>, notify_timeout: Duration) -> Self {
        Self { users, notifier, notify_timeout }
    }

    /// Places an order from `explicit` lines, or from the stored cart when
    /// `None`. The order is appended and the cart emptied in one write; the
    /// confirmation is sent in the background and never affects the result.
    #[tracing::instrument(skip(self, explicit), fields(explicit_lines = explicit.as_ref().map(Vec::len)))]
    pub async fn checkout(&self, user_id: &str, explicit: Option<Vec<LineItem>>) -> Result<Receipt> {
        let placed_at = Utc::now();
        let ((order, user_name, email), events) = modify_user(self.users.as_ref(), user_id, |user| {
            let order = user.place_order(explicit.clone(), placed_at)?;
            Ok((order, user.display_name(), user.email.clone()))
        })
        .await?;
        record_events(user_id, &events);

        let receipt = Receipt::from(&order);
        self.dispatch_confirmation(OrderConfirmation::for_order(user_name, email, &order));
        Ok(receipt)
    }

    fn dispatch_confirmation(&self, confirmation: OrderConfirmation) {
        let notifier = Arc::clone(&self.notifier);
        let limit = self.notify_timeout;
        tokio::spawn(async move {
            let order_id = confirmation.order_id.clone();
            match tokio::time::timeout(limit, notifier.send_order_confirmation(&confirmation)).await {
                Ok(outcome) if outcome.success => {
                    tracing::info!(%order_id, detail = %outcome.detail, "order confirmation sent");
                }
                Ok(outcome) => {
                    tracing::warn!(%order_id, detail = %outcome.detail, "order confirmation not sent");
                }
                Err(_) => {
                    tracing::warn!(%order_id, timeout_secs = limit.as_secs(), "order confirmation timed out");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Product;

    #[test]
    fn test_receipt_wire_shape() {
        let line = LineItem::from_product(&Product::create("P", "Widget", Money::cents(5000)), 2);
        let order = Order::place(vec![line], Utc::now()).unwrap();
        let json = serde_json::to_value(Receipt::from(&order)).unwrap();

        assert_eq!(json["subtotal"], 100.0);
        assert_eq!(json["discount"], 20.0);
        assert_eq!(json["discountRate"], 0.2);
        assert_eq!(json["deliveryRate"], 15.0);
        assert_eq!(json["deliveryFee"], 15.0);
        assert_eq!(json["total"], 95.0);
        assert_eq!(json["items"], 1);
        assert_eq!(json["order_id"], order.id().as_str());
    }
}
