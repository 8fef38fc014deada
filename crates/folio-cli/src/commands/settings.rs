//! Settings singleton CLI commands.

use clap::{Args, Subcommand, ValueEnum};

use folio_core::config::AppConfig;
use folio_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for settings commands
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings subcommand
    #[command(subcommand)]
    pub command: SettingsCommand,
}

/// Settings subcommands
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print one settings record, creating it with defaults if missing
    Show {
        /// Which record
        #[arg(value_enum, default_value = "system")]
        record: SettingsRecord,
    },
}

/// The singleton records
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingsRecord {
    System,
    Contact,
    About,
}

/// Execute settings commands
pub async fn execute(
    args: &SettingsArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (state, stores) = super::connect(config).await?;

    let SettingsCommand::Show { record } = &args.command;
    let result = match record {
        SettingsRecord::System => state
            .settings
            .system()
            .get()
            .await
            .map(|row| output::print_item(&row, format)),
        SettingsRecord::Contact => state
            .settings
            .contact()
            .get()
            .await
            .map(|row| output::print_item(&row, format)),
        SettingsRecord::About => state
            .settings
            .about()
            .get()
            .await
            .map(|row| output::print_item(&row, format)),
    };
    super::disconnect(stores).await;
    result
}
