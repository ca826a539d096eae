//! Order service.
//!
//! Checkout completion: snapshot a non-empty cart into an immutable order,
//! then clear the cart. Payment runs afterwards as its own step; if it
//! fails, the order simply stays `pending` (no compensation).

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use vitrine_core::{CartId, OrderId, OrderStatus, UserId};

use crate::models::{CartItemWithProduct, NewOrder, NewOrderItem, Order, OrderWithItems};
use crate::storage::{Storage, StorageError};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout was attempted on a cart with no items.
    #[error("cart is empty")]
    EmptyCart,

    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Shipping and payment selections collected during checkout.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub user_id: Option<UserId>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zipcode: String,
    pub shipping_method: String,
    pub shipping_cost: Decimal,
    pub payment_method: String,
}

/// Order queries and checkout completion.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Storage>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Storage` if the lookup fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.store.get_order(id).await?)
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Storage` if the lookup fails.
    pub async fn get_user_orders(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.get_user_orders(user_id).await?)
    }

    /// Get an order together with its snapshotted items.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Storage` if the lookup fails.
    pub async fn get_with_items(&self, id: OrderId) -> Result<Option<OrderWithItems>, OrderError> {
        Ok(self.store.get_order_with_items(id).await?)
    }

    /// Create an order from a cart.
    ///
    /// Snapshots every cart item (product id, name, quantity, unit price)
    /// into order items, computes subtotal from the cart and total as
    /// subtotal + shipping cost, then deletes the cart. The order starts
    /// `pending`; payment is a separate step.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the cart has no items,
    /// `OrderError::Storage` for storage failures.
    #[tracing::instrument(skip(self, details))]
    pub async fn create_from_cart(
        &self,
        cart_id: CartId,
        details: CheckoutDetails,
    ) -> Result<Order, OrderError> {
        let cart_items = self.store.get_cart_items(cart_id).await?;

        if cart_items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let subtotal: Decimal = cart_items.iter().map(CartItemWithProduct::line_total).sum();
        let total = subtotal + details.shipping_cost;

        let order = self
            .store
            .create_order(NewOrder {
                user_id: details.user_id,
                status: OrderStatus::Pending,
                shipping_address: details.shipping_address,
                shipping_city: details.shipping_city,
                shipping_state: details.shipping_state,
                shipping_zipcode: details.shipping_zipcode,
                shipping_method: details.shipping_method,
                shipping_cost: details.shipping_cost,
                payment_method: details.payment_method,
                subtotal,
                total,
            })
            .await?;

        for cart_item in cart_items {
            self.store
                .add_order_item(NewOrderItem {
                    order_id: order.id,
                    product_id: Some(cart_item.item.product_id),
                    product_name: cart_item.product.name,
                    quantity: cart_item.item.quantity,
                    price: cart_item.item.price,
                })
                .await?;
        }

        self.store.delete_cart(cart_id).await?;

        tracing::info!(order_id = %order.id, %cart_id, "order created from cart");
        Ok(order)
    }
}
