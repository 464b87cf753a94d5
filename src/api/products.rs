use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::ApiResult;
use crate::domain::aggregates::Product;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list().await?))
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog().search(params.name.as_deref()).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Product>> {
    Ok(Json(state.catalog().get(&id).await?))
}
