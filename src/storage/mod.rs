//! Persistence boundary.
//!
//! `UserStore` persists the user aggregate as a unit; `save` is a
//! compare-and-swap on `User::version`, so a write built from a stale read is
//! rejected with `StoreError::VersionConflict` instead of silently
//! overwriting a concurrent update. `Catalog` is the read side of products
//! plus the upsert used for seeding.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{Product, User};
use crate::CommerceError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("aggregate was modified concurrently")]
    VersionConflict,

    #[error("{0} is already in use")]
    Duplicate(&'static str),

    #[error("aggregate does not exist")]
    Missing,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for CommerceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::VersionConflict => CommerceError::Conflict("Concurrent update, please retry".into()),
            StoreError::Duplicate(field) => CommerceError::Conflict(format!("{} is already in use", capitalize(field))),
            StoreError::Missing => CommerceError::UserNotFound,
            StoreError::Database(e) => CommerceError::Storage(e.to_string()),
            StoreError::Corrupt(msg) => CommerceError::Storage(msg),
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// `email` is compared lower-cased.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn phone_in_use(&self, phone: &str) -> Result<bool, StoreError>;

    /// Fails with `Duplicate("email")` / `Duplicate("phone")` on unique clashes.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// Writes the whole aggregate if the stored version still equals
    /// `user.version`, bumping the stored version by one.
    async fn save(&self, user: &User) -> Result<(), StoreError>;
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn by_storage_id(&self, storage_id: &str) -> Result<Option<Product>, StoreError>;
    async fn by_catalog_id(&self, catalog_id: &str) -> Result<Option<Product>, StoreError>;
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Case-insensitive substring search on product name.
    async fn search(&self, name: &str) -> Result<Vec<Product>, StoreError>;

    async fn upsert(&self, product: &Product) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(CommerceError::from(StoreError::Missing), CommerceError::UserNotFound));
        match CommerceError::from(StoreError::Duplicate("phone")) {
            CommerceError::Conflict(msg) => assert_eq!(msg, "Phone is already in use"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(CommerceError::from(StoreError::VersionConflict), CommerceError::Conflict(_)));
    }
}
