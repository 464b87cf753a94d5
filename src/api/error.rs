//! HTTP mapping for service errors.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::CommerceError;

/// Every handler returns `Result<_, ApiError>`; the body is always `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub CommerceError);

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self { Self(e) }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self(CommerceError::Validation(rejection.body_text())) }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CommerceError::UserNotFound
            | CommerceError::ProductNotFound
            | CommerceError::LineNotFound
            | CommerceError::AddressNotFound
            | CommerceError::OrderNotFound => StatusCode::NOT_FOUND,
            CommerceError::InvalidQuantity
            | CommerceError::QuantityTooLarge
            | CommerceError::AmountOutOfRange
            | CommerceError::EmptyCart
            | CommerceError::Validation(_) => StatusCode::BAD_REQUEST,
            CommerceError::Conflict(_) => StatusCode::CONFLICT,
            CommerceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CommerceError::Storage(_) | CommerceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CommerceError::ProductNotFound, StatusCode::NOT_FOUND),
            (CommerceError::LineNotFound, StatusCode::NOT_FOUND),
            (CommerceError::InvalidQuantity, StatusCode::BAD_REQUEST),
            (CommerceError::QuantityTooLarge, StatusCode::BAD_REQUEST),
            (CommerceError::AmountOutOfRange, StatusCode::BAD_REQUEST),
            (CommerceError::EmptyCart, StatusCode::BAD_REQUEST),
            (CommerceError::Conflict("User already exists".into()), StatusCode::CONFLICT),
            (CommerceError::Unauthorized("Invalid token".into()), StatusCode::UNAUTHORIZED),
            (CommerceError::Storage("pool closed".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response = ApiError(CommerceError::Storage("relation users does not exist".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }
}
