//! Session middleware configuration.
//!
//! Sessions back both authentication state and the guest cart id. The store
//! matches the storage backend: `PostgreSQL` when a database is configured,
//! in-process memory otherwise.

use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vitrine_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

fn configure<Store: tower_sessions::SessionStore>(
    layer: SessionManagerLayer<Store>,
    config: &ServerConfig,
) -> SessionManagerLayer<Store> {
    layer
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Create the session layer backed by `PostgreSQL`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the sessions table migration fails.
pub async fn postgres_session_layer(
    pool: &PgPool,
    config: &ServerConfig,
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;
    Ok(configure(SessionManagerLayer::new(store), config))
}

/// Create the session layer backed by in-process memory.
#[must_use]
pub fn memory_session_layer(config: &ServerConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();
    configure(SessionManagerLayer::new(store), config)
}
