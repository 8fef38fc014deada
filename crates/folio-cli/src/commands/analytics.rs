//! Request telemetry rollup.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use folio_core::config::AppConfig;
use folio_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the analytics command
#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Window length in days (1-365)
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Number of endpoints to list
    #[arg(short, long)]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize, Tabled)]
struct EndpointRow {
    method: String,
    path: String,
    count: u64,
    avg_ms: f64,
}

#[derive(Debug, Serialize, Tabled)]
struct ErrorRow {
    status: i32,
    count: u64,
}

/// Execute the analytics command
pub async fn execute(
    args: &AnalyticsArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let days = args.days.unwrap_or(config.telemetry.default_window_days);
    let top = args.top.unwrap_or(config.telemetry.top_endpoints);

    let (state, stores) = super::connect(config).await?;
    let result = state.telemetry.analytics(days, top).await;
    super::disconnect(stores).await;
    let report = result?;

    if format == OutputFormat::Json {
        output::print_item(&report, format);
        return Ok(());
    }

    output::print_heading(&format!("Last {days} days"));
    output::print_kv("total_requests", &report.total_requests.to_string());
    output::print_kv("success_rate", &format!("{:.2}%", report.success_rate));
    output::print_kv(
        "response_time_ms",
        &format!(
            "avg {:.2} / min {:.2} / max {:.2}",
            report.avg_response_time_ms, report.min_response_time_ms, report.max_response_time_ms
        ),
    );

    output::print_heading("Top endpoints");
    let endpoints: Vec<EndpointRow> = report
        .top_endpoints
        .iter()
        .map(|e| EndpointRow {
            method: e.method.clone(),
            path: e.path.clone(),
            count: e.count,
            avg_ms: e.avg_response_time_ms,
        })
        .collect();
    output::print_list(&endpoints, format);

    output::print_heading("Errors");
    let errors: Vec<ErrorRow> = report
        .error_breakdown
        .iter()
        .map(|e| ErrorRow {
            status: e.status_code,
            count: e.count,
        })
        .collect();
    output::print_list(&errors, format);
    Ok(())
}
