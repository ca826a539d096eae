//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use vitrine_core::{CartId, OrderId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Order, OrderWithItems};
use crate::services::order::CheckoutDetails;
use crate::state::AppState;

/// Order creation request body: the source cart plus the shipping and
/// payment selections from checkout. Totals are recomputed server-side
/// from the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub cart_id: Option<i32>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zipcode: String,
    pub shipping_method: String,
    pub shipping_cost: Decimal,
    pub payment_method: String,
}

/// Create an order from a cart, snapshotting its items and clearing it.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let Some(cart_id) = request.cart_id else {
        return Err(AppError::BadRequest("Cart ID is required".to_owned()));
    };

    let details = CheckoutDetails {
        user_id: user.map(|u| u.id),
        shipping_address: request.shipping_address,
        shipping_city: request.shipping_city,
        shipping_state: request.shipping_state,
        shipping_zipcode: request.shipping_zipcode,
        shipping_method: request.shipping_method,
        shipping_cost: request.shipping_cost,
        payment_method: request.payment_method,
    };

    let order = state
        .orders()
        .create_from_cart(CartId::new(cart_id), details)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order with its snapshotted items.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderWithItems>> {
    let order = state
        .orders()
        .get_with_items(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_owned()))?;

    Ok(Json(order))
}

/// Get a user's order history, newest first. Users can only read their own.
pub async fn user_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<Order>>> {
    let user_id = UserId::new(user_id);
    if user.id != user_id {
        return Err(AppError::Unauthorized(
            "Cannot view another user's orders".to_owned(),
        ));
    }

    Ok(Json(state.orders().get_user_orders(user_id).await?))
}
