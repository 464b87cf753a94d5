use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{ApiResult, AuthUser};
use crate::domain::aggregates::Order;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: Order,
}

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<OrderList>> {
    Ok(Json(OrderList { orders: state.orders().list(auth.user_id()).await? }))
}

pub async fn get(State(state): State<AppState>, auth: AuthUser, Path(order_id): Path<String>) -> ApiResult<Json<OrderDetail>> {
    Ok(Json(OrderDetail { order: state.orders().get(auth.user_id(), &order_id).await? }))
}
