//! Request extractors: JSON bodies and the session for authenticated routes.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

use super::ApiError;
use crate::services::SessionClaims;
use crate::{AppState, CommerceError};

/// `Json<T>` whose rejections use the `{"error": ...}` body with a 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Verified caller. Reads the `token` header, falling back to
/// `Authorization: Bearer <token>`.
pub struct AuthUser(pub SessionClaims);

impl AuthUser {
    pub fn user_id(&self) -> &str { &self.0.uid }
}

fn session_token(parts: &Parts) -> Option<&str> {
    let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());
    header("token")
        .or_else(|| header("authorization").and_then(|v| v.strip_prefix("Bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| ApiError(CommerceError::Unauthorized("No authorization token provided".into())))?;
        let claims = state.sessions().verify(token)?;
        Ok(Self(claims))
    }
}
