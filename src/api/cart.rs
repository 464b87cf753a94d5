use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::{ApiJson, ApiResult, AuthUser, Message};
use crate::services::CartView;
use crate::{AppState, CommerceError};

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(rename = "productId", alias = "product_id")]
    pub product_id: String,
    pub qty: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<i64>,
}

pub async fn get_cart(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<CartView>> {
    Ok(Json(state.cart().get_cart(auth.user_id()).await?))
}

pub async fn add_item(State(state): State<AppState>, auth: AuthUser, ApiJson(body): ApiJson<AddItemRequest>) -> ApiResult<Json<Message>> {
    state.cart().add_item(auth.user_id(), &body.product_id, body.qty).await?;
    Ok(Message::new("Item added to cart"))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(line_id): Path<String>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> ApiResult<Json<Message>> {
    let quantity = body.quantity.ok_or(CommerceError::InvalidQuantity)?;
    state.cart().update_quantity(auth.user_id(), &line_id, quantity).await?;
    Ok(Message::new("Cart updated"))
}

pub async fn remove_item(State(state): State<AppState>, auth: AuthUser, Path(line_ref): Path<String>) -> ApiResult<Json<Message>> {
    state.cart().remove_item(auth.user_id(), &line_ref).await?;
    Ok(Message::new("Item removed from cart"))
}

pub async fn clear_cart(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Message>> {
    state.cart().clear_cart(auth.user_id()).await?;
    Ok(Message::new("Cart cleared"))
}
