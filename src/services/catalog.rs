//! Product lookup across both identifier schemes, plus listing and search.

use std::sync::Arc;

use crate::domain::aggregates::{generate_catalog_id, Product};
use crate::domain::value_objects::{Money, StorageId};
use crate::storage::Catalog;
use crate::{CommerceError, Result};

/// Resolve a client-supplied product reference. First match wins:
///
/// 1. storage id lookup, if `reference` looks like a storage id
/// 2. catalog id lookup
/// 3. storage id lookup regardless of shape
/// 4. `ProductNotFound`
pub async fn resolve_product(catalog: &dyn Catalog, reference: &str) -> Result<Product> {
    if StorageId::is_well_formed(reference) {
        if let Some(product) = catalog.by_storage_id(reference).await? {
            return Ok(product);
        }
    }
    if let Some(product) = catalog.by_catalog_id(reference).await? {
        return Ok(product);
    }
    if let Some(product) = catalog.by_storage_id(reference).await? {
        return Ok(product);
    }
    Err(CommerceError::ProductNotFound)
}

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn Catalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self { Self { catalog } }

    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.catalog.list().await?)
    }

    pub async fn get(&self, reference: &str) -> Result<Product> {
        resolve_product(self.catalog.as_ref(), reference).await
    }

    pub async fn search(&self, name: Option<&str>) -> Result<Vec<Product>> {
        let query = name.map(str::trim).filter(|q| !q.is_empty())
            .ok_or_else(|| CommerceError::Validation("Invalid search query".into()))?;
        Ok(self.catalog.search(query).await?)
    }
}

/// Seeds the demo products when the catalog is empty. Returns how many were added.
pub async fn seed_demo_catalog(catalog: &dyn Catalog) -> Result<usize> {
    if !catalog.list().await?.is_empty() {
        return Ok(0);
    }
    let demo = [
        ("Wireless Headphones", 299, "Audio", 4.5, "photo-1505740420928-5e560c06d30e"),
        ("Smart Watch", 199, "Wearables", 4.8, "photo-1523275335684-37898b6baf30"),
        ("Gaming Monitor", 449, "Electronics", 4.7, "photo-1527443224154-c4a3942d3acf"),
        ("Wireless Mouse", 89, "Gaming", 4.6, "photo-1527864550417-7fd91fc51a46"),
        ("Bluetooth Speaker", 129, "Audio", 4.5, "photo-1608043152269-423dbba4e7e1"),
        ("Mechanical Keyboard", 159, "Gaming", 4.4, "photo-1541140532154-b024d705b90a"),
        ("USB-C Hub", 79, "Accessories", 4.3, "photo-1587825140708-dfaf72ae4b04"),
        ("Laptop Stand", 49, "Accessories", 4.2, "photo-1527864550417-7fd91fc51a46"),
    ];
    for (name, price, category, rating, photo) in demo {
        let product = Product::create(generate_catalog_id(), name, Money::cents(price * 100))
            .with_category(category)
            .with_rating(rating)
            .with_image(format!("https://images.unsplash.com/{photo}?w=400"));
        catalog.upsert(&product).await?;
    }
    tracing::info!(count = demo.len(), "seeded demo catalog");
    Ok(demo.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Catalog stub that records which lookups were attempted.
    struct Recording {
        inner: MemoryStore,
        calls: Mutex<Vec<&'static str>>,
    }

    impl Recording {
        async fn with(products: &[Product]) -> Self {
            let inner = MemoryStore::new();
            for p in products { inner.upsert(p).await.unwrap(); }
            Self { inner, calls: Mutex::new(vec![]) }
        }
        fn calls(&self) -> Vec<&'static str> { self.calls.lock().unwrap().clone() }
    }

    #[async_trait]
    impl Catalog for Recording {
        async fn by_storage_id(&self, id: &str) -> std::result::Result<Option<Product>, StoreError> {
            self.calls.lock().unwrap().push("storage");
            self.inner.by_storage_id(id).await
        }
        async fn by_catalog_id(&self, id: &str) -> std::result::Result<Option<Product>, StoreError> {
            self.calls.lock().unwrap().push("catalog");
            self.inner.by_catalog_id(id).await
        }
        async fn list(&self) -> std::result::Result<Vec<Product>, StoreError> { self.inner.list().await }
        async fn search(&self, name: &str) -> std::result::Result<Vec<Product>, StoreError> { self.inner.search(name).await }
        async fn upsert(&self, p: &Product) -> std::result::Result<(), StoreError> { self.inner.upsert(p).await }
    }

    fn widget() -> Product { Product::create("product_1_abc", "Widget", Money::cents(1000)) }

    #[tokio::test]
    async fn test_well_formed_storage_id_hits_first_branch() {
        let p = widget();
        let catalog = Recording::with(&[p.clone()]).await;
        let found = resolve_product(&catalog, p.storage_id.as_str()).await.unwrap();
        assert_eq!(found, p);
        assert_eq!(catalog.calls(), vec!["storage"]);
    }

    #[tokio::test]
    async fn test_catalog_id_hits_second_branch() {
        let p = widget();
        let catalog = Recording::with(&[p.clone()]).await;
        let found = resolve_product(&catalog, "product_1_abc").await.unwrap();
        assert_eq!(found, p);
        assert_eq!(catalog.calls(), vec!["catalog"]);
    }

    #[tokio::test]
    async fn test_malformed_storage_id_hits_fallback_branch() {
        let mut p = widget();
        p.storage_id = StorageId::from("legacy-0001");
        let catalog = Recording::with(&[p.clone()]).await;
        let found = resolve_product(&catalog, "legacy-0001").await.unwrap();
        assert_eq!(found, p);
        assert_eq!(catalog.calls(), vec!["catalog", "storage"]);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_not_found() {
        let catalog = Recording::with(&[widget()]).await;
        let missing = StorageId::generate();
        let err = resolve_product(&catalog, missing.as_str()).await.unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound));
        assert_eq!(catalog.calls(), vec!["storage", "catalog", "storage"]);
    }

    #[tokio::test]
    async fn test_seed_only_into_empty_catalog() {
        let store = MemoryStore::new();
        assert_eq!(seed_demo_catalog(&store).await.unwrap(), 8);
        assert_eq!(seed_demo_catalog(&store).await.unwrap(), 0);
        assert_eq!(store.search("wireless").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(service.search(None).await, Err(CommerceError::Validation(_))));
        assert!(matches!(service.search(Some("  ")).await, Err(CommerceError::Validation(_))));
    }
}
