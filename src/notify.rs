//! Order confirmation delivery.
//!
//! Notifiers never fail past their own boundary; they report an outcome that
//! the checkout flow only logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::aggregates::{LineItem, Order};
use crate::domain::value_objects::{Money, StorageId};

pub const ORDER_CONFIRMED_SUBJECT: &str = "commerce.orders.confirmed";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub user_name: String,
    pub email: String,
    pub order_id: StorageId,
    pub items: Vec<LineItem>,
    pub total: Money,
    pub subtotal: Money,
    pub discount: Money,
    pub delivery_fee: Money,
    pub timestamp: DateTime<Utc>,
}

impl OrderConfirmation {
    pub fn for_order(user_name: String, email: String, order: &Order) -> Self {
        let pricing = order.pricing();
        Self {
            user_name, email, order_id: order.id().clone(), items: order.items().to_vec(),
            total: pricing.total, subtotal: pricing.subtotal, discount: pricing.discount,
            delivery_fee: pricing.delivery_fee, timestamp: order.ordered_on(),
        }
    }

    pub fn has_deliverable_address(&self) -> bool { self.email.contains('@') }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub success: bool,
    pub detail: String,
}

impl NotificationOutcome {
    pub fn delivered(detail: impl Into<String>) -> Self { Self { success: true, detail: detail.into() } }
    pub fn skipped(detail: impl Into<String>) -> Self { Self { success: false, detail: detail.into() } }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_order_confirmation(&self, confirmation: &OrderConfirmation) -> NotificationOutcome;
}

/// Publishes confirmations as JSON on a NATS subject.
pub struct NatsNotifier {
    client: async_nats::Client,
    subject: String,
}

impl NatsNotifier {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client, subject: ORDER_CONFIRMED_SUBJECT.to_string() }
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn send_order_confirmation(&self, confirmation: &OrderConfirmation) -> NotificationOutcome {
        if !confirmation.has_deliverable_address() {
            return NotificationOutcome::skipped("invalid email address");
        }
        let payload = match serde_json::to_vec(confirmation) {
            Ok(p) => p,
            Err(e) => return NotificationOutcome::skipped(format!("encode failed: {e}")),
        };
        match self.client.publish(self.subject.clone(), payload.into()).await {
            Ok(()) => NotificationOutcome::delivered(format!("published to {}", self.subject)),
            Err(e) => NotificationOutcome::skipped(format!("publish failed: {e}")),
        }
    }
}

/// Used when no transport is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_order_confirmation(&self, confirmation: &OrderConfirmation) -> NotificationOutcome {
        tracing::info!(
            to = %confirmation.email,
            order_id = %confirmation.order_id,
            total = %confirmation.total,
            "notifications not configured, skipping order confirmation"
        );
        NotificationOutcome::skipped("notifications not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Product;

    fn confirmation(email: &str) -> OrderConfirmation {
        let line = LineItem::from_product(&Product::create("A", "Smart Watch", Money::cents(19900)), 1);
        let order = Order::place(vec![line], Utc::now()).unwrap();
        OrderConfirmation::for_order("Ada Lovelace".into(), email.into(), &order)
    }

    #[test]
    fn test_confirmation_mirrors_order() {
        let c = confirmation("ada@example.com");
        assert_eq!(c.subtotal, Money::cents(19900));
        assert_eq!(c.discount, Money::cents(3980));
        assert_eq!(c.total, Money::cents(17420));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["userName"], "Ada Lovelace");
        assert!(json["orderId"].is_string());
        assert_eq!(json["deliveryFee"], 15.0);
    }

    #[tokio::test]
    async fn test_log_notifier_reports_unconfigured() {
        let outcome = LogNotifier.send_order_confirmation(&confirmation("ada@example.com")).await;
        assert!(!outcome.success);
        assert!(!confirmation("not-an-address").has_deliverable_address());
    }
}
