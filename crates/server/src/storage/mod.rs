//! Storage layer for the storefront.
//!
//! # Tables
//!
//! - `users` - Site accounts (argon2 password hashes)
//! - `products` - Catalog
//! - `carts` / `cart_items` - Per-user/session shopping carts
//! - `orders` / `order_items` - Checkout snapshots
//! - `shipping_options` - Static shipping catalog
//! - `payment_methods` - Static payment catalog
//! - `sessions` - Tower-sessions storage (Postgres backend only)
//!
//! # Backends
//!
//! [`Storage`] is the CRUD seam the service layer talks to. Two
//! implementations exist:
//!
//! - [`MemStorage`] - in-process maps, seeded with sample data; used when no
//!   database is configured and by the test suite.
//! - [`PgStorage`] - `PostgreSQL` via sqlx; the production backend.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p vitrine-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use vitrine_core::{
    CartId, CartItemId, OrderId, OrderStatus, PaymentMethodId, ProductId, ShippingOptionId, UserId,
};

use crate::models::{
    Cart, CartItem, CartItemWithProduct, NewCartItem, NewOrder, NewOrderItem, NewProduct, NewUser,
    Order, OrderItem, OrderWithItems, PaymentMethod, Product, ShippingOption, User,
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemStorage;
pub use postgres::PgStorage;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data at rest is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// CRUD accessors over the storefront tables.
///
/// The trait is object-safe so the service layer can hold an
/// `Arc<dyn Storage>` and swap backends at startup.
#[async_trait]
pub trait Storage: Send + Sync {
    // User methods
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;

    // Product methods
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;
    async fn get_all_products(&self) -> Result<Vec<Product>>;
    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>>;
    async fn search_products(&self, query: &str) -> Result<Vec<Product>>;
    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    // Cart methods
    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>>;
    async fn get_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>>;
    async fn create_cart(&self, user_id: Option<UserId>) -> Result<Cart>;
    /// Delete a cart and all of its items. Returns `false` if the cart did
    /// not exist.
    async fn delete_cart(&self, id: CartId) -> Result<bool>;

    // Cart item methods
    async fn get_cart_items(&self, cart_id: CartId) -> Result<Vec<CartItemWithProduct>>;
    /// Add an item to a cart. If the cart already holds the product, the
    /// existing row's quantity is incremented instead of inserting a
    /// duplicate.
    async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem>;
    async fn update_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>>;
    /// Returns `false` if the item did not exist.
    async fn remove_cart_item(&self, id: CartItemId) -> Result<bool>;

    // Order methods
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;
    /// All orders for a user, newest first.
    async fn get_user_orders(&self, user_id: UserId) -> Result<Vec<Order>>;
    async fn create_order(&self, order: NewOrder) -> Result<Order>;
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>>;

    // Order item methods
    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>>;
    async fn add_order_item(&self, item: NewOrderItem) -> Result<OrderItem>;
    async fn get_order_with_items(&self, order_id: OrderId) -> Result<Option<OrderWithItems>>;

    // Shipping option methods
    async fn get_shipping_options(&self) -> Result<Vec<ShippingOption>>;
    async fn get_shipping_option(&self, id: ShippingOptionId) -> Result<Option<ShippingOption>>;
    async fn create_shipping_option(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        estimated_days: &str,
    ) -> Result<ShippingOption>;

    // Payment method methods
    /// Active payment methods only.
    async fn get_payment_methods(&self) -> Result<Vec<PaymentMethod>>;
    async fn get_payment_method(&self, id: PaymentMethodId) -> Result<Option<PaymentMethod>>;
    async fn get_payment_method_by_code(&self, code: &str) -> Result<Option<PaymentMethod>>;
    async fn create_payment_method(&self, name: &str, code: &str) -> Result<PaymentMethod>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
