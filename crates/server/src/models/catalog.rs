//! Catalog domain types: products, shipping options, payment methods.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{PaymentMethodId, ProductId, ShippingOptionId};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price (string-encoded decimal on the wire).
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    /// Units in stock.
    pub stock: i32,
    /// Average review rating, 0.0-5.0.
    pub rating: Decimal,
}

/// Data required to create a new product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub rating: Decimal,
}

/// A shipping option offered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: ShippingOptionId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Human-readable delivery estimate (e.g., "3-5 days").
    pub estimated_days: String,
}

/// A payment method offered at checkout.
///
/// The `code` is the stable identifier the payment simulation dispatches on
/// (`credit`, `boleto`, `pix`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    pub code: String,
    pub is_active: bool,
}
