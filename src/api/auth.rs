use axum::{extract::State, http::StatusCode, Json};

use super::{ApiJson, ApiResult, AuthUser, Message};
use crate::services::identity::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserProfile};
use crate::AppState;

pub async fn register(State(state): State<AppState>, ApiJson(body): ApiJson<RegisterRequest>) -> ApiResult<(StatusCode, Json<Message>)> {
    state.identity().register(body).await?;
    Ok((StatusCode::CREATED, Message::new("User registered successfully")))
}

pub async fn login(State(state): State<AppState>, ApiJson(body): ApiJson<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
    Ok(Json(state.identity().login(body).await?))
}

/// Tokens are stateless; the client drops them.
pub async fn logout() -> Json<Message> {
    Message::new("Logged out successfully")
}

pub async fn profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.identity().profile(auth.user_id()).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.identity().update_profile(auth.user_id(), body).await?))
}
