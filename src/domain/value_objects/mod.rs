//! Value Objects for the cart and checkout domain

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use thiserror::Error;
use uuid::Uuid;

/// Identifier generated by the persistence layer for products and
/// embedded sub-documents (cart lines, orders, addresses).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(String);

impl StorageId {
    pub fn generate() -> Self { Self(Uuid::now_v7().to_string()) }
    pub fn as_str(&self) -> &str { &self.0 }

    /// Whether `raw` has the lexical shape of a generated storage id.
    pub fn is_well_formed(raw: &str) -> bool { Uuid::parse_str(raw).is_ok() }
}

impl From<&str> for StorageId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl From<String> for StorageId {
    fn from(value: String) -> Self { Self(value) }
}

impl PartialEq<str> for StorageId {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Money value object. Single currency; amounts serialize as JSON numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    /// Amount given in cents, e.g. `Money::cents(1999)` is 19.99.
    pub fn cents(cents: i64) -> Self { Self(Decimal::new(cents, 2)) }
    pub fn amount(&self) -> Decimal { self.0 }
    /// Saturates at the decimal range; checkout figures use the `checked_*` forms.
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0.saturating_mul(Decimal::from(qty))) }
    pub fn scale(&self, rate: Decimal) -> Money { Money(self.0 * rate) }

    pub fn checked_multiply(&self, qty: u32) -> Option<Money> { self.0.checked_mul(Decimal::from(qty)).map(Money) }
    pub fn checked_scale(&self, rate: Decimal) -> Option<Money> { self.0.checked_mul(rate).map(Money) }
    pub fn checked_add(&self, rhs: Money) -> Option<Money> { self.0.checked_add(rhs.0).map(Money) }
    pub fn checked_sub(&self, rhs: Money) -> Option<Money> { self.0.checked_sub(rhs.0).map(Money) }

    /// Half-up rounding to two decimal places.
    pub fn round_cents(&self) -> Money {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money(self.0.saturating_add(rhs.0)) }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money { Money(self.0.saturating_sub(rhs.0)) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::zero(), Add::add) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:.2}", self.0) }
}

/// Quantity of a cart line; never below one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 { return Err(QuantityError::BelowOne); }
        u32::try_from(value).map(Self).map_err(|_| QuantityError::TooLarge)
    }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
}

impl Default for Quantity { fn default() -> Self { Self(1) } }

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity must be at least 1")]
    BelowOne,
    #[error("quantity is too large")]
    TooLarge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_id_format() {
        assert!(StorageId::is_well_formed(StorageId::generate().as_str()));
        assert!(!StorageId::is_well_formed("product_1700000000000_k3j2h1g0f"));
        assert!(!StorageId::is_well_formed(""));
    }

    #[test]
    fn test_money_rounding() {
        assert_eq!(Money::new(Decimal::new(12345, 3)).round_cents(), Money::cents(1235));
        assert_eq!(Money::new(Decimal::new(12344, 3)).round_cents(), Money::cents(1234));
        assert_eq!(Money::cents(1000).multiply(3), Money::cents(3000));
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_multiply(2), None);
        assert_eq!(max.checked_add(Money::cents(1)), None);
        assert_eq!(max.multiply(2), max);
        assert_eq!(max + max, max);
        assert_eq!(Money::cents(1999).to_string(), "19.99");
    }

    #[test]
    fn test_quantity_floor() {
        assert_eq!(Quantity::new(0), Err(QuantityError::BelowOne));
        assert_eq!(Quantity::new(-4), Err(QuantityError::BelowOne));
        assert_eq!(Quantity::new(3).unwrap().value(), 3);
        assert_eq!(Quantity::new(i64::from(u32::MAX) + 1), Err(QuantityError::TooLarge));
        assert_eq!(Quantity::new(2).unwrap().add(u32::MAX).value(), u32::MAX);
    }
}
