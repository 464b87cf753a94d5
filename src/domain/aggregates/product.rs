//! Product Aggregate
//!
//! Catalog entries are read-only to the cart and checkout code. A product is
//! addressable by two identifiers: the generated `storage_id` and the
//! human-assigned `catalog_id`.

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::value_objects::{Money, StorageId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub storage_id: StorageId,
    #[serde(rename = "product_id")]
    pub catalog_id: String,
    #[serde(rename = "product_name")]
    pub name: String,
    pub price: Money,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn create(catalog_id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            storage_id: StorageId::generate(), catalog_id: catalog_id.into(), name: name.into(), price,
            category: None, rating: None, image: None, description: None,
            specifications: BTreeMap::new(), stock: None, tags: vec![], created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self { self.category = Some(category.into()); self }
    pub fn with_rating(mut self, rating: f64) -> Self { self.rating = Some(rating); self }
    pub fn with_image(mut self, url: impl Into<String>) -> Self { self.image = Some(url.into()); self }

    /// Case-insensitive substring match on the product name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Catalog id in the `product_<millis>_<suffix>` shape used by seeded products.
pub fn generate_catalog_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("product_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_create() {
        let p = Product::create("product_1700000000000_wh01", "Smart Watch", Money::cents(19900)).with_rating(4.8);
        assert_eq!(p.name, "Smart Watch");
        assert!(StorageId::is_well_formed(p.storage_id.as_str()));
        assert_eq!(p.rating, Some(4.8));
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let p = Product::create("product_1700000000000_ms02", "Wireless Mouse", Money::cents(8900));
        assert!(p.name_matches("MOUSE"));
        assert!(p.name_matches("less m"));
        assert!(!p.name_matches("keyboard"));
    }

    #[test]
    fn test_generated_catalog_id_is_not_a_storage_id() {
        let id = generate_catalog_id();
        assert!(id.starts_with("product_"));
        assert!(!StorageId::is_well_formed(&id));
    }
}
