//! Integration tests for Vitrine.
//!
//! Each test spawns the real axum application on an ephemeral port with
//! in-memory storage (seeded with the sample catalog) and an in-memory
//! session store, then drives it over HTTP with a cookie-holding reqwest
//! client. No external services are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use reqwest::Client;
use serde_json::{Value, json};

use vitrine_server::config::ServerConfig;
use vitrine_server::state::AppState;
use vitrine_server::storage::MemStorage;
use vitrine_server::{app, middleware};

/// A running test server plus a cookie-holding client.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Spawn the application on an ephemeral port with seeded in-memory
    /// storage.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started or the client built - fatal
    /// for any test using it.
    pub async fn spawn() -> Self {
        let config = ServerConfig::default();
        let session_layer = middleware::memory_session_layer(&config);
        let state = AppState::new(config, Arc::new(MemStorage::with_sample_data()));
        let router = app(state).layer(session_layer);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    /// Build a full URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register and log in a fresh user; returns the user JSON.
    ///
    /// # Panics
    ///
    /// Panics if registration does not return 201 - fatal for any test
    /// using it.
    pub async fn register_user(&self, username: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/register"))
            .json(&json!({
                "username": username,
                "password": "correct horse battery",
                "email": format!("{username}@example.com"),
                "name": "Test User",
            }))
            .send()
            .await
            .expect("register request failed");

        assert_eq!(resp.status(), 201, "registration should succeed");
        resp.json().await.expect("register response body")
    }

    /// Add a product to the session cart; returns the item JSON.
    ///
    /// # Panics
    ///
    /// Panics if the add does not return 201 - fatal for any test using it.
    pub async fn add_to_cart(&self, product_id: i64, quantity: i64) -> Value {
        let resp = self
            .client
            .post(self.url("/api/cart/items"))
            .json(&json!({ "productId": product_id, "quantity": quantity }))
            .send()
            .await
            .expect("add to cart request failed");

        assert_eq!(resp.status(), 201, "add to cart should succeed");
        resp.json().await.expect("cart item body")
    }

    /// Fetch the current cart (`{cart, items}`).
    ///
    /// # Panics
    ///
    /// Panics if the request fails - fatal for any test using it.
    pub async fn cart(&self) -> Value {
        let resp = self
            .client
            .get(self.url("/api/cart"))
            .send()
            .await
            .expect("cart request failed");

        assert_eq!(resp.status(), 200);
        resp.json().await.expect("cart body")
    }
}
