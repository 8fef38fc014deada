//! Audit trail recording and search.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::types::{JsonMap, PageResponse};
use folio_database::store::AuditStore;
use folio_entity::audit::{
    AuditAction, AuditChanges, AuditEntry, AuditQuery, EntityKind, NewAuditEntry, Severity,
};
use folio_entity::user::Actor;

use crate::context::RequestContext;

/// Optional attributes of an audit entry.
///
/// Defaults: no actor, no entity id, generated description, empty payload
/// and changes, [`Severity::Info`], `success = true`, empty error message,
/// `requested_at = now`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditOptions {
    pub actor: Option<Actor>,
    pub entity_id: Option<String>,
    /// Blank descriptions are replaced by a generated one.
    pub description: Option<String>,
    pub payload: JsonMap,
    pub changes: AuditChanges,
    pub severity: Severity,
    pub success: bool,
    pub error_message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_key: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            actor: None,
            entity_id: None,
            description: None,
            payload: JsonMap::new(),
            changes: AuditChanges::new(),
            severity: Severity::Info,
            success: true,
            error_message: String::new(),
            ip_address: None,
            user_agent: None,
            session_key: None,
            requested_at: None,
        }
    }
}

impl AuditOptions {
    /// Options carrying the actor and origin of a request.
    pub fn from_context(ctx: &RequestContext) -> Self {
        Self {
            actor: ctx.actor.clone(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            session_key: ctx.session_key.clone(),
            requested_at: Some(ctx.request_time),
            ..Self::default()
        }
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn payload(mut self, payload: JsonMap) -> Self {
        self.payload = payload;
        self
    }

    pub fn changes(mut self, changes: AuditChanges) -> Self {
        self.changes = changes;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Marks the action as failed with the given message.
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = error_message.into();
        self
    }
}

/// Default description: `"<Action> <entity kind> <entity id>"`.
pub fn describe(action: AuditAction, kind: EntityKind, entity_id: Option<&str>) -> String {
    let kind_name = kind.display_name().to_lowercase();
    match entity_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{} {kind_name} {id}", action.display_name()),
        None => format!("{} {kind_name}", action.display_name()),
    }
}

/// Appends to and searches the audit trail.
#[derive(Debug, Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Appends one entry.
    pub async fn record(
        &self,
        action: AuditAction,
        entity_kind: EntityKind,
        options: AuditOptions,
    ) -> AppResult<AuditEntry> {
        let description = options
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| describe(action, entity_kind, options.entity_id.as_deref()));

        let (actor_id, actor_label) = match options.actor {
            Some(actor) => (Some(actor.id), Some(actor.label)),
            None => (None, None),
        };

        let entry = NewAuditEntry {
            action,
            entity_kind,
            entity_id: options.entity_id,
            actor_id,
            actor_label,
            ip_address: options.ip_address,
            user_agent: options.user_agent,
            session_key: options.session_key,
            description,
            payload: options.payload,
            changes: options.changes,
            severity: options.severity,
            success: options.success,
            error_message: options.error_message,
            requested_at: options.requested_at.unwrap_or_else(Utc::now),
        };

        let stored = self.store.insert(entry).await?;
        debug!(
            id = %stored.id,
            action = %stored.action,
            entity_kind = %stored.entity_kind,
            "Recorded audit entry"
        );
        Ok(stored)
    }

    /// Like [`record`](Self::record), but a failure is logged and swallowed.
    pub async fn record_or_warn(
        &self,
        action: AuditAction,
        entity_kind: EntityKind,
        options: AuditOptions,
    ) -> Option<AuditEntry> {
        match self.record(action, entity_kind, options).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(
                    action = %action,
                    entity_kind = %entity_kind,
                    error = %e,
                    "Failed to record audit entry"
                );
                None
            }
        }
    }

    /// Filters, orders and pages the trail.
    pub async fn query(&self, query: &AuditQuery) -> AppResult<PageResponse<AuditEntry>> {
        self.store.search(query).await
    }

    /// Fetches one entry.
    pub async fn get(&self, id: Uuid) -> AppResult<AuditEntry> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Audit entry {id} not found")))
    }

    /// Nulls the actor reference of every entry by `actor_id`.
    pub async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64> {
        self.store.detach_actor(actor_id).await
    }
}
