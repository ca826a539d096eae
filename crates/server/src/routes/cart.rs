//! Cart route handlers.
//!
//! The cart is resolved from the logged-in user when there is one, or from
//! the cart id stored in the session for guests. The first cart operation
//! creates the cart lazily.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use vitrine_core::{CartId, CartItemId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{Cart, CartItem, CartItemWithProduct, session_keys};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// `GET /api/cart` response body.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
    pub items: Vec<CartItemWithProduct>,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// Query parameters for clearing a cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearQuery {
    pub cart_id: i32,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the guest cart ID from the session.
async fn session_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<CartId>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Remember the cart ID in the session.
async fn remember_cart_id(session: &Session, cart_id: CartId) {
    if let Err(e) = session.insert(session_keys::CART_ID, cart_id).await {
        tracing::error!("Failed to save cart ID to session: {e}");
    }
}

/// Resolve (or lazily create) the cart for this request.
async fn resolve_cart(
    state: &AppState,
    session: &Session,
    user: Option<&crate::models::CurrentUser>,
) -> Result<Cart> {
    let session_cart = session_cart_id(session).await;
    let cart = state
        .carts()
        .get_or_create(user.map(|u| u.id), session_cart)
        .await?;

    if session_cart != Some(cart.id) {
        remember_cart_id(session, cart.id).await;
    }

    Ok(cart)
}

// =============================================================================
// Handlers
// =============================================================================

/// Get the current cart and its items.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    let cart = resolve_cart(&state, &session, user.as_ref()).await?;
    let items = state.carts().items(cart.id).await?;

    tracing::debug!(cart_id = %cart.id, items = items.len(), "cart fetched");
    Ok(Json(CartResponse { cart, items }))
}

/// Add an item to the current cart.
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItem>)> {
    if request.quantity < 1 {
        return Err(AppError::BadRequest("Invalid quantity".to_owned()));
    }

    let cart = resolve_cart(&state, &session, user.as_ref()).await?;
    let item = state
        .carts()
        .add_item(cart.id, ProductId::new(request.product_id), request.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update the quantity of a cart item.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartItem>> {
    if request.quantity < 1 {
        return Err(AppError::BadRequest("Invalid quantity".to_owned()));
    }

    let item = state
        .carts()
        .update_item_quantity(CartItemId::new(id), request.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item".to_owned()))?;

    Ok(Json(item))
}

/// Remove an item from the cart.
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    if state.carts().remove_item(CartItemId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Cart item".to_owned()))
    }
}

/// Delete a cart and all of its items.
pub async fn clear(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> Result<StatusCode> {
    if state.carts().clear(CartId::new(query.cart_id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Cart".to_owned()))
    }
}
