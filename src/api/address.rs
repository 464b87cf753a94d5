use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{ApiJson, ApiResult, AuthUser, Message};
use crate::domain::aggregates::{Address, AddressPatch, NewAddress};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AddressList {
    pub addresses: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct AddressCreated {
    pub message: String,
    pub address: Address,
}

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<AddressList>> {
    Ok(Json(AddressList { addresses: state.addresses().list(auth.user_id()).await? }))
}

pub async fn add(State(state): State<AppState>, auth: AuthUser, ApiJson(body): ApiJson<NewAddress>) -> ApiResult<Json<AddressCreated>> {
    let address = state.addresses().add(auth.user_id(), body).await?;
    Ok(Json(AddressCreated { message: "Address added successfully".into(), address }))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(address_id): Path<String>,
    ApiJson(body): ApiJson<AddressPatch>,
) -> ApiResult<Json<Message>> {
    state.addresses().update(auth.user_id(), &address_id, body).await?;
    Ok(Message::new("Address updated successfully"))
}

pub async fn remove(State(state): State<AppState>, auth: AuthUser, Path(address_id): Path<String>) -> ApiResult<Json<Message>> {
    state.addresses().delete(auth.user_id(), &address_id).await?;
    Ok(Message::new("Address deleted successfully"))
}
