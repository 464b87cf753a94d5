//! Checkout pricing.
//!
//! Subtotal, a flat 20% discount and a flat 15.00 delivery fee. The subtotal
//! is rounded to cents first so every stored figure satisfies
//! `total == subtotal - discount + delivery_fee` exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::LineItem;
use crate::domain::value_objects::Money;

/// 0.20
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
/// 15.00
pub const DELIVERY_FEE: Money = Money::new(Decimal::from_parts(1500, 0, 0, false, 2));

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub discount_rate: Decimal,
    pub discount: Money,
    pub delivery_fee: Money,
    #[serde(rename = "total_price")]
    pub total: Money,
}

impl PriceBreakdown {
    /// Prices a line list. Lines with a zero quantity are charged as one unit.
    /// `None` when a figure leaves the decimal range.
    pub fn for_lines(lines: &[LineItem]) -> Option<Self> {
        let subtotal = lines
            .iter()
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line.price.checked_multiply(line.quantity.max(1))?))?
            .round_cents();
        let discount = subtotal.checked_scale(DISCOUNT_RATE)?.round_cents();
        let total = subtotal.checked_sub(discount)?.checked_add(DELIVERY_FEE)?.round_cents();
        Some(Self { subtotal, discount_rate: DISCOUNT_RATE, discount, delivery_fee: DELIVERY_FEE, total })
    }
}
