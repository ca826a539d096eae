//! Database migration command.
//!
//! Applies the migrations embedded from `crates/server/migrations` to the
//! database named by `VITRINE_DATABASE_URL`.

use tracing::info;

use vitrine_server::storage::create_pool;

use super::{CommandError, database_url};

/// Run pending migrations.
///
/// # Errors
///
/// Returns an error if the environment is incomplete, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
