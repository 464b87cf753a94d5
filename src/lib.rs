//! Vibe Commerce
//!
//! Cart, checkout and order history backend for a small storefront.
//!
//! ## Features
//! - Product catalog lookup by storage id or catalog id
//! - Per-user shopping cart with line merging
//! - Checkout into immutable order records with a fixed pricing scheme
//! - Address book and order history
//! - Signed session tokens for the REST surface

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;

pub use config::{AppConfig, SessionConfig};
pub use state::AppState;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CommerceError {
    #[error("User not found")]
    UserNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Cart item not found")]
    LineNotFound,

    #[error("Address not found")]
    AddressNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Quantity is too large")]
    QuantityTooLarge,

    #[error("Amount out of range")]
    AmountOutOfRange,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CommerceError>;

impl From<domain::aggregates::CartError> for CommerceError {
    fn from(e: domain::aggregates::CartError) -> Self {
        match e {
            domain::aggregates::CartError::LineNotFound => CommerceError::LineNotFound,
        }
    }
}

impl From<domain::aggregates::OrderError> for CommerceError {
    fn from(e: domain::aggregates::OrderError) -> Self {
        match e {
            domain::aggregates::OrderError::NoItems => CommerceError::EmptyCart,
            domain::aggregates::OrderError::AmountOutOfRange => CommerceError::AmountOutOfRange,
        }
    }
}

impl From<domain::value_objects::QuantityError> for CommerceError {
    fn from(e: domain::value_objects::QuantityError) -> Self {
        match e {
            domain::value_objects::QuantityError::BelowOne => CommerceError::InvalidQuantity,
            domain::value_objects::QuantityError::TooLarge => CommerceError::QuantityTooLarge,
        }
    }
}
