//! Vitrine Server - Storefront REST API.
//!
//! Library surface of the storefront binary so the API can be driven
//! in-process by the integration test suite.
//!
//! # Architecture
//!
//! - Axum handlers under `/api/*` returning JSON
//! - Service layer over a swappable [`storage::Storage`] backend
//!   (`PostgreSQL` in production, in-memory for development and tests)
//! - tower-sessions cookie sessions for auth state and the guest cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

use state::AppState;

/// Build the application router (health endpoints + `/api` routes).
///
/// The session layer is applied by the caller so each storage backend can
/// pair with its matching session store.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Probes the storage backend before returning OK.
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storage().get_payment_methods().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
