//! REST surface. Everything except `/health` lives under `/api`; cart,
//! checkout, order and address routes require a session token.

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::AppState;

mod address;
mod auth;
mod cart;
mod checkout;
pub mod error;
pub mod extract;
mod orders;
mod products;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, AuthUser};

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Json<Self> { Json(Self { message: message.into() }) }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/user/profile", get(auth::profile).put(auth::update_profile))
        .route("/products", get(products::list))
        .route("/products/search", get(products::search))
        .route("/products/:id", get(products::get))
        .route("/cart", get(cart::get_cart).post(cart::add_item).delete(cart::clear_cart))
        .route("/cart/items/:id", put(cart::update_quantity))
        .route("/cart/:id", delete(cart::remove_item))
        .route("/checkout", post(checkout::checkout))
        .route("/orders", get(orders::list))
        .route("/orders/:id", get(orders::get))
        .route("/address", get(address::list).post(address::add))
        .route("/address/:id", put(address::update).delete(address::remove));

    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "vibe-commerce"})) }))
        .nest("/api", api)
        .with_state(state)
}
