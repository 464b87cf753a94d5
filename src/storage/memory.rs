//! In-process store backing tests and database-less runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Catalog, StoreError, UserStore};
use crate::domain::aggregates::{Product, User};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

fn clash(users: &HashMap<String, User>, candidate: &User) -> Option<&'static str> {
    let others = || users.values().filter(|u| u.user_id != candidate.user_id);
    if others().any(|u| u.email == candidate.email) { return Some("email"); }
    if others().any(|u| u.phone == candidate.phone) { return Some("phone"); }
    None
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn phone_in_use(&self, phone: &str) -> Result<bool, StoreError> {
        Ok(self.users.read().await.values().any(|u| u.phone == phone))
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if let Some(field) = clash(&users, user) { return Err(StoreError::Duplicate(field)); }
        if users.contains_key(&user.user_id) { return Err(StoreError::Duplicate("user_id")); }
        let mut stored = user.clone();
        stored.take_events();
        users.insert(stored.user_id.clone(), stored);
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let current = users.get(&user.user_id).ok_or(StoreError::Missing)?;
        if current.version != user.version { return Err(StoreError::VersionConflict); }
        if let Some(field) = clash(&users, user) { return Err(StoreError::Duplicate(field)); }
        let mut stored = user.clone();
        stored.take_events();
        stored.version += 1;
        users.insert(stored.user_id.clone(), stored);
        Ok(())
    }
}

#[async_trait]
impl Catalog for MemoryStore {
    async fn by_storage_id(&self, storage_id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.iter().find(|p| p.storage_id == *storage_id).cloned())
    }

    async fn by_catalog_id(&self, catalog_id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.iter().find(|p| p.catalog_id == catalog_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn search(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.iter().filter(|p| p.name_matches(name)).cloned().collect())
    }

    async fn upsert(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.storage_id == product.storage_id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str, phone: &str) -> User {
        User::register(id, "Ada", "Lovelace", email, phone, "hash")
    }

    #[tokio::test]
    async fn test_save_rejects_stale_version() {
        let store = MemoryStore::new();
        store.insert(&user("u1", "a@x.io", "1")).await.unwrap();

        let first = store.find("u1").await.unwrap().unwrap();
        let stale = first.clone();
        store.save(&first).await.unwrap();
        assert!(matches!(store.save(&stale).await, Err(StoreError::VersionConflict)));
        assert_eq!(store.find("u1").await.unwrap().unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = MemoryStore::new();
        store.insert(&user("u1", "a@x.io", "1")).await.unwrap();
        assert!(matches!(store.insert(&user("u2", "A@X.io", "2")).await, Err(StoreError::Duplicate("email"))));
        assert!(matches!(store.insert(&user("u3", "b@x.io", "1")).await, Err(StoreError::Duplicate("phone"))));
    }

    #[tokio::test]
    async fn test_save_missing_user() {
        let store = MemoryStore::new();
        assert!(matches!(store.save(&user("ghost", "g@x.io", "9")).await, Err(StoreError::Missing)));
    }
}
