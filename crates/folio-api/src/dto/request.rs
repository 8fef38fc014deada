//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_core::error::AppError;
use folio_core::types::PageRequest;
use folio_entity::audit::{AuditAction, AuditOrdering, AuditQuery, EntityKind, Severity};
use folio_entity::health::CheckKind;
use folio_entity::request_log::{RequestLogQuery, RequestOrdering};
use folio_service::audit::AuditOptions;
use folio_service::context::RequestContext;

use crate::extractors::PaginationParams;

fn page(page: Option<u64>, page_size: Option<u64>) -> PageRequest {
    PaginationParams { page, page_size }.into_page_request()
}

/// Query string of `GET /api/admin/audit-logs`.
///
/// `ordering` is one of `-created_at` (default), `created_at`,
/// `-severity`, `severity`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogParams {
    pub action: Option<AuditAction>,
    pub entity_kind: Option<EntityKind>,
    pub severity: Option<Severity>,
    pub success: Option<bool>,
    pub actor_id: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl AuditLogParams {
    pub fn into_query(self) -> Result<AuditQuery, AppError> {
        let ordering = match self.ordering.as_deref() {
            Some(raw) => raw.parse::<AuditOrdering>()?,
            None => AuditOrdering::default(),
        };
        Ok(AuditQuery {
            action: self.action,
            entity_kind: self.entity_kind,
            severity: self.severity,
            success: self.success,
            actor_id: self.actor_id,
            search: self.search,
            ordering,
            page: page(self.page, self.page_size),
        })
    }
}

/// Query string of `GET /api/admin/api-logs`.
///
/// `ordering` is one of `-created_at` (default), `created_at`,
/// `-response_time`, `response_time`, `-status_code`, `status_code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiLogParams {
    pub method: Option<String>,
    pub status_code: Option<i32>,
    pub is_authenticated: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl ApiLogParams {
    pub fn into_query(self) -> Result<RequestLogQuery, AppError> {
        let ordering = match self.ordering.as_deref() {
            Some(raw) => raw.parse::<RequestOrdering>()?,
            None => RequestOrdering::default(),
        };
        Ok(RequestLogQuery {
            method: self.method,
            status_code: self.status_code,
            is_authenticated: self.is_authenticated,
            search: self.search,
            ordering,
            page: page(self.page, self.page_size),
        })
    }
}

/// Query string of `GET /api/admin/api-analytics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsParams {
    /// Window length in days; the configured default when absent.
    pub days: Option<u32>,
    /// Number of endpoints to list; the configured default when absent.
    pub top: Option<usize>,
}

/// Query string of `GET /api/admin/health-checks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthHistoryParams {
    pub check_kind: Option<CheckKind>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl HealthHistoryParams {
    pub fn page_request(&self) -> PageRequest {
        page(self.page, self.page_size)
    }
}

/// Body of `POST /api/admin/audit-logs`.
///
/// Collaborators may name the actor and origin explicitly; otherwise the
/// caller and the request origin are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAuditRequest {
    pub action: AuditAction,
    pub entity_kind: EntityKind,
    #[serde(flatten)]
    pub options: AuditOptions,
}

impl RecordAuditRequest {
    /// Options with gaps filled from the request context.
    pub fn into_options(self, ctx: &RequestContext) -> AuditOptions {
        let mut options = self.options;
        options.actor = options.actor.or_else(|| ctx.actor.clone());
        options.ip_address = options.ip_address.or_else(|| ctx.ip_address.clone());
        options.user_agent = options.user_agent.or_else(|| ctx.user_agent.clone());
        options.session_key = options.session_key.or_else(|| ctx.session_key.clone());
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_params_ordering() {
        let params = AuditLogParams {
            ordering: Some("-severity".to_string()),
            ..AuditLogParams::default()
        };
        assert_eq!(
            params.into_query().unwrap().ordering,
            AuditOrdering::SeverityDesc
        );

        let params = AuditLogParams {
            ordering: Some("priority".to_string()),
            ..AuditLogParams::default()
        };
        assert!(params.into_query().is_err());
    }

    #[test]
    fn test_record_request_accepts_legacy_changes() {
        let body = serde_json::json!({
            "action": "update",
            "entity_kind": "article",
            "entity_id": "42",
            "changes": {"title": ["Old", "New"]}
        });
        let req: RecordAuditRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.action, AuditAction::Update);
        assert_eq!(req.options.changes["title"].after, serde_json::json!("New"));
        assert!(req.options.success);
    }
}
