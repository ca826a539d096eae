//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (storage probe)
//!
//! # Products
//! GET  /api/products               - Product listing (?category= / ?search=)
//! GET  /api/products/{id}          - Product detail
//! GET  /api/categories             - Distinct category list
//!
//! # Cart
//! GET  /api/cart                   - Current cart with items (lazily created)
//! POST /api/cart/items             - Add item (201)
//! PUT  /api/cart/items/{id}        - Update quantity
//! DELETE /api/cart/items/{id}      - Remove item (204)
//! DELETE /api/cart?cartId=         - Clear cart (204)
//!
//! # Shipping
//! GET  /api/shipping/options       - All shipping options
//! POST /api/shipping/calculate     - Options + suggested option for a cart
//!
//! # Payment
//! GET  /api/payment/methods        - Active payment methods
//! POST /api/payment/process        - Simulate a charge for an order
//!
//! # Orders
//! POST /api/orders                 - Create order from cart (201)
//! GET  /api/orders/{id}            - Order with snapshotted items
//! GET  /api/user/{userId}/orders   - Order history (own orders only)
//!
//! # Recommendations
//! GET  /api/recommendations        - ?productId= / ?userId= / popular
//!
//! # Auth (session cookie)
//! POST /api/register               - Create account and log in (201)
//! POST /api/login                  - Log in
//! POST /api/logout                 - Log out (204)
//! GET  /api/user                   - Current user (401 when logged out)
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod payment;
pub mod products;
pub mod recommendations;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the shipping routes router.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/shipping/options", get(shipping::options))
        .route("/shipping/calculate", post(shipping::calculate))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payment/methods", get(payment::methods))
        .route("/payment/process", post(payment::process))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create))
        .route("/orders/{id}", get(orders::show))
        .route("/user/{userId}/orders", get(orders::user_orders))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
}

/// Create all `/api` routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(product_routes())
        .merge(cart_routes())
        .merge(shipping_routes())
        .merge(payment_routes())
        .merge(order_routes())
        .merge(auth_routes())
        .route(
            "/recommendations",
            get(recommendations::index),
        );

    Router::new().nest("/api", api)
}
