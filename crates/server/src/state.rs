//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{
    AuthService, CartService, OrderService, PaymentService, ProductService, RecommendationService,
    ShippingService,
};
use crate::storage::Storage;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; exposes the configuration, the storage
/// handle, and the service layer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    storage: Arc<dyn Storage>,
    products: ProductService,
    carts: CartService,
    shipping: ShippingService,
    payments: PaymentService,
    orders: OrderService,
    recommendations: RecommendationService,
    auth: AuthService,
}

impl AppState {
    /// Create the application state over a storage backend.
    #[must_use]
    pub fn new(config: ServerConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products: ProductService::new(Arc::clone(&storage)),
                carts: CartService::new(Arc::clone(&storage)),
                shipping: ShippingService::new(Arc::clone(&storage)),
                payments: PaymentService::new(Arc::clone(&storage)),
                orders: OrderService::new(Arc::clone(&storage)),
                recommendations: RecommendationService::new(Arc::clone(&storage)),
                auth: AuthService::new(Arc::clone(&storage)),
                storage,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Get a reference to the product service.
    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    /// Get a reference to the shipping service.
    #[must_use]
    pub fn shipping(&self) -> &ShippingService {
        &self.inner.shipping
    }

    /// Get a reference to the payment service.
    #[must_use]
    pub fn payments(&self) -> &PaymentService {
        &self.inner.payments
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the recommendation service.
    #[must_use]
    pub fn recommendations(&self) -> &RecommendationService {
        &self.inner.recommendations
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
