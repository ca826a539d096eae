//! Payment route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;

use vitrine_core::OrderId;

use crate::error::{AppError, Result};
use crate::models::PaymentMethod;
use crate::services::payment::PaymentOutcome;
use crate::state::AppState;

/// Payment processing request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub order_id: Option<i32>,
    pub payment_method: Option<String>,
    pub payment_details: Option<Value>,
}

/// List active payment methods.
pub async fn methods(State(state): State<AppState>) -> Result<Json<Vec<PaymentMethod>>> {
    Ok(Json(state.payments().get_all_methods().await?))
}

/// Simulate processing a payment for an order.
pub async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<PaymentOutcome>> {
    let (Some(order_id), Some(method)) = (request.order_id, request.payment_method) else {
        return Err(AppError::BadRequest(
            "Order ID and payment method are required".to_owned(),
        ));
    };

    let outcome = state
        .payments()
        .process(
            OrderId::new(order_id),
            &method,
            request.payment_details.as_ref(),
        )
        .await?;

    Ok(Json(outcome))
}
