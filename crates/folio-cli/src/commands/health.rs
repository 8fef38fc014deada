//! One-shot health probe.

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use folio_core::config::AppConfig;
use folio_core::error::AppError;

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct CheckRow {
    check: String,
    passed: bool,
    detail: String,
}

/// Run every configured check once and persist the result, like
/// `GET /api/health`. Exits non-zero when the probe is unhealthy.
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let (state, stores) = super::connect(config).await?;
    let report = state.health.check().await;
    super::disconnect(stores).await;

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            let rows: Vec<CheckRow> = report
                .checks
                .iter()
                .map(|(name, outcome)| CheckRow {
                    check: name.clone(),
                    passed: outcome.passed,
                    detail: match &outcome.detail {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    },
                })
                .collect();
            output::print_list(&rows, format);
            output::print_kv("status", report.status());
            output::print_kv("elapsed", &format!("{:.2} ms", report.elapsed_ms));
        }
    }

    if report.overall {
        Ok(())
    } else {
        Err(AppError::service_unavailable(folio_service::health::FAILED_CHECKS_MESSAGE))
    }
}
