//! CLI command definitions and dispatch.

pub mod analytics;
pub mod audit;
pub mod health;
pub mod migrate;
pub mod serve;
pub mod settings;
pub mod stats;

use clap::{Parser, Subcommand};

use folio_api::AppState;
use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_database::Stores;

use crate::output::OutputFormat;

/// Folio: settings, audit trail and health telemetry backend
#[derive(Debug, Parser)]
#[command(name = "folio", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to apply (`config/<env>.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Apply pending database migrations
    Migrate,
    /// Audit trail
    Audit(audit::AuditArgs),
    /// Run the health probe once
    Health,
    /// Settings singletons
    Settings(settings::SettingsArgs),
    /// Dashboard statistics snapshot
    Stats,
    /// Request telemetry rollup
    Analytics(analytics::AnalyticsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config_dir, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(config).await,
            Commands::Audit(args) => audit::execute(args, config, self.format).await,
            Commands::Health => health::execute(config, self.format).await,
            Commands::Settings(args) => settings::execute(args, config, self.format).await,
            Commands::Stats => stats::execute(config, self.format).await,
            Commands::Analytics(args) => analytics::execute(args, config, self.format).await,
        }
    }
}

/// Helper: wire the services the same way the server does.
pub async fn connect(config: AppConfig) -> Result<(AppState, Stores), AppError> {
    folio_api::init_state(config).await
}

/// Helper: release the database pool, if any.
pub async fn disconnect(stores: Stores) {
    if let Some(pool) = &stores.pool {
        pool.close().await;
    }
}
