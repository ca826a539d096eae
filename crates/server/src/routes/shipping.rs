//! Shipping route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use vitrine_core::CartId;

use crate::error::{AppError, Result};
use crate::models::ShippingOption;
use crate::services::shipping::ShippingCalculation;
use crate::state::AppState;

/// Shipping calculation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub cart_id: Option<i32>,
    pub zipcode: Option<String>,
}

/// List all shipping options.
pub async fn options(State(state): State<AppState>) -> Result<Json<Vec<ShippingOption>>> {
    Ok(Json(state.shipping().get_all().await?))
}

/// Calculate shipping for a cart and destination zipcode.
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<ShippingCalculation>> {
    let (Some(cart_id), Some(zipcode)) = (request.cart_id, request.zipcode) else {
        return Err(AppError::BadRequest(
            "Cart ID and zipcode are required".to_owned(),
        ));
    };

    let calculation = state
        .shipping()
        .calculate(CartId::new(cart_id), &zipcode)
        .await?;

    Ok(Json(calculation))
}
