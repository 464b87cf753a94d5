//! PostgreSQL store. The user aggregate lives in one row: identity columns
//! plus JSONB columns for the embedded collections and a `version` counter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::BTreeMap;

use super::{Catalog, StoreError, UserStore};
use crate::domain::aggregates::{Address, Cart, Order, Product, User};
use crate::domain::value_objects::{Money, StorageId};

const USER_COLUMNS: &str = "user_id, first_name, last_name, email, phone, password_hash, token, refresh_token, addresses, cart, orders, version, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "storage_id, catalog_id, product_name, price, category, rating, image, description, specifications, stock, tags, created_at";

#[derive(Clone)]
pub struct PgStore { db: PgPool }

impl PgStore {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String, first_name: String, last_name: String, email: String, phone: String,
    password_hash: String, token: Option<String>, refresh_token: Option<String>,
    addresses: Json<Vec<Address>>, cart: Json<Cart>, orders: Json<Vec<Order>>, version: i64,
    created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User::restore(
            r.user_id, r.first_name, r.last_name, r.email, r.phone, r.password_hash, r.token, r.refresh_token,
            r.addresses.0, r.cart.0, r.orders.0, r.version, r.created_at, r.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    storage_id: String, catalog_id: String, product_name: String, price: Decimal,
    category: Option<String>, rating: Option<f64>, image: Option<String>, description: Option<String>,
    specifications: Json<BTreeMap<String, String>>, stock: Option<i32>, tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            storage_id: StorageId::from(r.storage_id), catalog_id: r.catalog_id, name: r.product_name,
            price: Money::new(r.price), category: r.category, rating: r.rating, image: r.image,
            description: r.description, specifications: r.specifications.0, stock: r.stock, tags: r.tags,
            created_at: r.created_at,
        }
    }
}

/// Maps unique-constraint violations on `users` to the clashing field.
fn unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("phone") => "phone",
                Some(c) if c.contains("email") => "email",
                _ => "user_id",
            };
            return StoreError::Duplicate(field);
        }
    }
    StoreError::Database(e)
}

/// Escapes LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id).fetch_optional(&self.db).await?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.to_lowercase()).fetch_optional(&self.db).await?;
        Ok(row.map(User::from))
    }

    async fn phone_in_use(&self, phone: &str) -> Result<bool, StoreError> {
        let found: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE phone = $1")
            .bind(phone).fetch_optional(&self.db).await?;
        Ok(found.is_some())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(&format!("INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"))
            .bind(&user.user_id).bind(&user.first_name).bind(&user.last_name).bind(&user.email).bind(&user.phone)
            .bind(&user.password_hash).bind(&user.token).bind(&user.refresh_token)
            .bind(Json(&user.addresses)).bind(Json(&user.cart)).bind(Json(&user.orders))
            .bind(user.version).bind(user.created_at).bind(user.updated_at)
            .execute(&self.db).await.map_err(unique_violation)?;
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET first_name = $2, last_name = $3, email = $4, phone = $5, password_hash = $6, \
             token = $7, refresh_token = $8, addresses = $9, cart = $10, orders = $11, \
             version = version + 1, updated_at = $12 \
             WHERE user_id = $1 AND version = $13",
        )
        .bind(&user.user_id).bind(&user.first_name).bind(&user.last_name).bind(&user.email).bind(&user.phone)
        .bind(&user.password_hash).bind(&user.token).bind(&user.refresh_token)
        .bind(Json(&user.addresses)).bind(Json(&user.cart)).bind(Json(&user.orders))
        .bind(user.updated_at).bind(user.version)
        .execute(&self.db).await.map_err(unique_violation)?;

        if result.rows_affected() == 1 { return Ok(()); }
        let exists: Option<(i64,)> = sqlx::query_as("SELECT version FROM users WHERE user_id = $1")
            .bind(&user.user_id).fetch_optional(&self.db).await?;
        Err(if exists.is_some() { StoreError::VersionConflict } else { StoreError::Missing })
    }
}

#[async_trait]
impl Catalog for PgStore {
    async fn by_storage_id(&self, storage_id: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE storage_id = $1"))
            .bind(storage_id).fetch_optional(&self.db).await?;
        Ok(row.map(Product::from))
    }

    async fn by_catalog_id(&self, catalog_id: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE catalog_id = $1"))
            .bind(catalog_id).fetch_optional(&self.db).await?;
        Ok(row.map(Product::from))
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at"))
            .fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_name ILIKE $1 ESCAPE '\\' ORDER BY created_at"
        ))
        .bind(like_pattern(name)).fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn upsert(&self, p: &Product) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (storage_id) DO UPDATE SET catalog_id = $2, product_name = $3, price = $4, category = $5, \
             rating = $6, image = $7, description = $8, specifications = $9, stock = $10, tags = $11"
        ))
        .bind(p.storage_id.as_str()).bind(&p.catalog_id).bind(&p.name).bind(p.price.amount())
        .bind(&p.category).bind(p.rating).bind(&p.image).bind(&p.description)
        .bind(Json(&p.specifications)).bind(p.stock).bind(&p.tags).bind(p.created_at)
        .execute(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("mouse"), "%mouse%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
