//! Shopping cart service.
//!
//! Carts are created lazily: the first cart operation for a user or session
//! creates one. Adding a product that is already in the cart increments the
//! existing row's quantity; the unit price is always taken from the product
//! at the time of the add.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use vitrine_core::{CartId, CartItemId, ProductId, UserId};

use crate::models::{Cart, CartItem, CartItemWithProduct, NewCartItem};
use crate::storage::{Storage, StorageError};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Cart operations.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn Storage>,
}

impl CartService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the lookup fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, CartError> {
        Ok(self.store.get_cart(id).await?)
    }

    /// Get the cart for a user or session, creating one if none exists.
    ///
    /// Resolution order: the user's cart when logged in, then the cart the
    /// session already points at, then a freshly created cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if a lookup or the create fails.
    pub async fn get_or_create(
        &self,
        user_id: Option<UserId>,
        session_cart: Option<CartId>,
    ) -> Result<Cart, CartError> {
        if let Some(user_id) = user_id {
            if let Some(cart) = self.store.get_cart_by_user(user_id).await? {
                return Ok(cart);
            }
        } else if let Some(cart_id) = session_cart {
            if let Some(cart) = self.store.get_cart(cart_id).await? {
                return Ok(cart);
            }
        }

        Ok(self.store.create_cart(user_id).await?)
    }

    /// All items in a cart, joined with their products.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the lookup fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItemWithProduct>, CartError> {
        Ok(self.store.get_cart_items(cart_id).await?)
    }

    /// Add a product to a cart.
    ///
    /// The stored unit price is the product's current price, regardless of
    /// what the client sent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist,
    /// `CartError::Storage` for storage failures.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, CartError> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        let item = NewCartItem {
            cart_id,
            product_id,
            quantity,
            price: product.price,
        };

        match self.store.add_cart_item(item).await {
            Ok(item) => Ok(item),
            Err(StorageError::NotFound) => Err(CartError::ProductNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Update the quantity of a cart item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the update fails.
    pub async fn update_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, CartError> {
        Ok(self.store.update_cart_item_quantity(id, quantity).await?)
    }

    /// Remove an item from a cart. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the delete fails.
    pub async fn remove_item(&self, id: CartItemId) -> Result<bool, CartError> {
        Ok(self.store.remove_cart_item(id).await?)
    }

    /// Delete a cart and all of its items. Returns `false` if the cart did
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the delete fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<bool, CartError> {
        Ok(self.store.delete_cart(cart_id).await?)
    }

    /// Cart total: Σ(item.price × item.quantity).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the lookup fails.
    pub async fn total(&self, cart_id: CartId) -> Result<Decimal, CartError> {
        let items = self.store.get_cart_items(cart_id).await?;
        Ok(items.iter().map(CartItemWithProduct::line_total).sum())
    }
}
