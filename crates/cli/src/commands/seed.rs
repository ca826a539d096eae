//! Seed command.
//!
//! Populates a fresh database with the sample catalog, shipping options,
//! and payment methods. A non-empty catalog is left alone unless `--force`
//! is given.

use tracing::{info, warn};

use vitrine_server::storage::{PgStorage, Storage, create_pool, seed};

use super::{CommandError, database_url};

/// Seed the database.
///
/// # Errors
///
/// Returns an error if the environment is incomplete, the database is
/// unreachable, or an insert fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let store = PgStorage::new(pool);

    if !force && !store.get_all_products().await?.is_empty() {
        warn!("Products already exist; skipping seed (use --force to seed anyway)");
        return Ok(());
    }

    let products = seed::sample_products();
    let product_count = products.len();
    for product in products {
        store.create_product(product).await?;
    }
    info!(count = product_count, "Products seeded");

    let mut option_count = 0;
    for option in seed::shipping_options() {
        store
            .create_shipping_option(
                option.name,
                option.description,
                option.price,
                option.estimated_days,
            )
            .await?;
        option_count += 1;
    }
    info!(count = option_count, "Shipping options seeded");

    let mut method_count = 0;
    for method in seed::payment_methods() {
        match store.create_payment_method(method.name, method.code).await {
            Ok(_) => method_count += 1,
            // Codes are unique; an existing row from a previous seed is fine
            Err(vitrine_server::storage::StorageError::Conflict(_)) => {
                warn!(code = method.code, "Payment method already exists");
            }
            Err(e) => return Err(e.into()),
        }
    }
    info!(count = method_count, "Payment methods seeded");

    info!("Seeding complete");
    Ok(())
}
