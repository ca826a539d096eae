//! Shipping service.
//!
//! The option list is static (seeded into storage). The only pricing rule:
//! carts above the free-shipping threshold get the express option for free;
//! everything else is steered to the standard option.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{CartId, ShippingOptionId};

use crate::models::{CartItemWithProduct, ShippingOption};
use crate::storage::{Storage, StorageError};

/// Subtotals strictly above this get free express shipping.
const FREE_SHIPPING_THRESHOLD: i64 = 300;

/// Result of a shipping calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCalculation {
    /// Every available option, unmodified.
    pub options: Vec<ShippingOption>,
    /// The option the storefront suggests, if any.
    pub best_option: Option<ShippingOption>,
}

/// Shipping queries and the free-shipping rule.
#[derive(Clone)]
pub struct ShippingService {
    store: Arc<dyn Storage>,
}

impl ShippingService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// All shipping options.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn get_all(&self) -> Result<Vec<ShippingOption>, StorageError> {
        self.store.get_shipping_options().await
    }

    /// Get a shipping option by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn get(&self, id: ShippingOptionId) -> Result<Option<ShippingOption>, StorageError> {
        self.store.get_shipping_option(id).await
    }

    /// Calculate shipping for a cart and destination zipcode.
    ///
    /// The zipcode is accepted for interface compatibility but does not
    /// influence the result; only the cart subtotal does.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a lookup fails.
    pub async fn calculate(
        &self,
        cart_id: CartId,
        _zipcode: &str,
    ) -> Result<ShippingCalculation, StorageError> {
        let options = self.store.get_shipping_options().await?;

        let items = self.store.get_cart_items(cart_id).await?;
        let subtotal: Decimal = items.iter().map(CartItemWithProduct::line_total).sum();

        let best_option = if subtotal > Decimal::from(FREE_SHIPPING_THRESHOLD) {
            options
                .iter()
                .find(|option| option.name.contains("Express"))
                .map(|option| ShippingOption {
                    // Two decimal places so the wire format stays "0.00"
                    price: Decimal::new(0, 2),
                    name: format!("{} (Free)", option.name),
                    ..option.clone()
                })
        } else {
            options
                .iter()
                .find(|option| option.name.contains("Standard"))
                .cloned()
        };

        Ok(ShippingCalculation {
            options,
            best_option,
        })
    }
}
