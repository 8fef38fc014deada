//! Dashboard statistics snapshot.

use folio_core::config::AppConfig;
use folio_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Print totals, recent counts, resources and database size.
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let (state, stores) = super::connect(config).await?;
    let result = state.stats.snapshot().await;
    super::disconnect(stores).await;
    let stats = result?;

    if format == OutputFormat::Json {
        output::print_item(&stats, format);
        return Ok(());
    }

    output::print_heading("Totals");
    output::print_item(&stats.totals, format);
    output::print_heading("Last 7 days");
    output::print_item(&stats.recent, format);
    match &stats.resources {
        Some(resources) => {
            output::print_heading("Resources");
            output::print_item(resources, format);
        }
        None => output::print_warning("Resource sampling unavailable"),
    }
    output::print_kv("database_size", &stats.database_size);
    Ok(())
}
