use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;

use super::{ApiResult, AuthUser};
use crate::domain::aggregates::LineItem;
use crate::services::Receipt;
use crate::{AppState, CommerceError};

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "cartItems")]
    pub cart_items: Option<Vec<LineItem>>,
}

impl CheckoutRequest {
    /// A blank body means "check out the stored cart"; anything else must parse.
    fn parse(body: &[u8]) -> crate::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| CommerceError::Validation(format!("Invalid checkout request: {e}")))
    }
}

pub async fn checkout(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Json<Receipt>> {
    let request = CheckoutRequest::parse(&body)?;
    Ok(Json(state.checkout().checkout(auth.user_id(), request.cart_items).await?))
}
