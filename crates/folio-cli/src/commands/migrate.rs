//! Database migration command.

use folio_core::config::{AppConfig, DatabaseBackend};
use folio_core::error::AppError;
use folio_database::DatabasePool;
use folio_database::migration::run_migrations;

use crate::output;

/// Apply every pending migration to the configured PostgreSQL database.
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("Database backend is 'memory'; nothing to migrate.");
        return Ok(());
    }

    let db = DatabasePool::connect(&config.database).await?;
    println!("Running database migrations...");
    let result = run_migrations(db.pool()).await;
    db.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
