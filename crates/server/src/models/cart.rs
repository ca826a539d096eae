//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{CartId, CartItemId, ProductId, UserId};

use super::Product;

/// A shopping cart.
///
/// Carts are created lazily on first use, tied to a user when one is logged
/// in or to the session otherwise, and deleted when checkout completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single product row in a cart.
///
/// `price` is the product's unit price captured when the item was added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A cart item joined with its product, as returned by `GET /api/cart`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemWithProduct {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

impl CartItemWithProduct {
    /// Line total for this row.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.item.quantity)
    }
}

/// Data required to add an item to a cart.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price at time of add; the cart service forces this to the
    /// product's current price.
    pub price: Decimal,
}
