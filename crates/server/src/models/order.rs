//! Order domain types.
//!
//! An order is an immutable snapshot of a cart at checkout completion,
//! together with the shipping and payment selections. Order items carry the
//! product name and price at the time of the order so later product edits
//! do not rewrite history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A completed (or pending-payment) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zipcode: String,
    pub shipping_method: String,
    pub shipping_cost: Decimal,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A snapshotted line item belonging to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// The source product; `None` once the product has been deleted.
    pub product_id: Option<ProductId>,
    /// Product name at the time of the order.
    pub product_name: String,
    pub quantity: i32,
    /// Unit price at the time of the order.
    pub price: Decimal,
}

/// An order joined with its items, as returned by `GET /api/orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Data required to create a new order record.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zipcode: String,
    pub shipping_method: String,
    pub shipping_cost: Decimal,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// Data required to snapshot a cart item into an order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}
