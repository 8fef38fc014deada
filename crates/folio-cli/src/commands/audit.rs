//! Audit trail CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_core::types::PageRequest;
use folio_entity::audit::{
    AuditAction, AuditEntry, AuditOrdering, AuditQuery, EntityKind, Severity,
};

use crate::output::{self, OutputFormat};

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Search the audit trail, newest first
    Search {
        /// Filter by action (create, update, login, ...)
        #[arg(short, long)]
        action: Option<AuditAction>,
        /// Filter by entity kind (article, system, ...)
        #[arg(short = 'k', long)]
        entity_kind: Option<EntityKind>,
        /// Filter by severity
        #[arg(short, long)]
        severity: Option<Severity>,
        /// Filter by actor id
        #[arg(long)]
        actor: Option<uuid::Uuid>,
        /// Only failed actions
        #[arg(long)]
        failed: bool,
        /// Substring over description, entity id and actor label
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Ordering (-created_at, created_at, -severity, severity)
        #[arg(short, long, default_value = "-created_at")]
        ordering: AuditOrdering,
        /// Number of results
        #[arg(short, long, default_value = "50")]
        limit: u64,
    },
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    time: String,
    actor: String,
    action: String,
    entity: String,
    severity: String,
    success: bool,
    description: String,
}

impl From<&AuditEntry> for AuditRow {
    fn from(e: &AuditEntry) -> Self {
        let entity = match &e.entity_id {
            Some(id) => format!("{} {id}", e.entity_kind),
            None => e.entity_kind.to_string(),
        };
        Self {
            time: e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            actor: e.actor_display(),
            action: e.action.to_string(),
            entity,
            severity: e.severity.to_string(),
            success: e.success,
            description: e.description.clone(),
        }
    }
}

/// Execute audit commands
pub async fn execute(
    args: &AuditArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (state, stores) = super::connect(config).await?;

    match &args.command {
        AuditCommand::Search {
            action,
            entity_kind,
            severity,
            actor,
            failed,
            search,
            ordering,
            limit,
        } => {
            let query = AuditQuery {
                action: *action,
                entity_kind: *entity_kind,
                severity: *severity,
                success: failed.then_some(false),
                actor_id: *actor,
                search: search.clone(),
                ordering: *ordering,
                page: PageRequest::new(1, *limit),
            };
            let result = state.audit.query(&query).await;
            super::disconnect(stores).await;
            let page = result?;

            match format {
                OutputFormat::Json => output::print_item(&page, format),
                OutputFormat::Table => {
                    let rows: Vec<AuditRow> = page.items.iter().map(AuditRow::from).collect();
                    output::print_list(&rows, format);
                    println!("{} of {} entries", rows.len(), page.total_items);
                }
            }
        }
    }

    Ok(())
}
