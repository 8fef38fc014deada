//! Audit log entry entity model and query types.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use folio_core::AppError;
use folio_core::types::{JsonMap, PageRequest, SortDirection};

use super::action::AuditAction;
use super::changes::{AuditChanges, summarize};
use super::entity_kind::EntityKind;
use super::severity::Severity;

/// An immutable audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// Server-assigned insertion sequence; breaks ordering ties.
    pub seq: i64,
    /// What happened.
    #[sqlx(try_from = "String")]
    pub action: AuditAction,
    /// Kind of the affected record.
    #[sqlx(try_from = "String")]
    pub entity_kind: EntityKind,
    /// Identifier of the affected record, if any.
    pub entity_id: Option<String>,
    /// Acting account; nulled when the account is removed.
    pub actor_id: Option<Uuid>,
    /// Snapshot of the actor's display identity.
    pub actor_label: Option<String>,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// Session key of the originating request.
    pub session_key: Option<String>,
    /// Human-readable description.
    pub description: String,
    /// Opaque action data.
    #[sqlx(json)]
    pub payload: JsonMap,
    /// Field-level changes.
    #[sqlx(json)]
    pub changes: AuditChanges,
    /// Severity level.
    #[sqlx(try_from = "String")]
    pub severity: Severity,
    /// Whether the audited action succeeded.
    pub success: bool,
    /// Failure reason when `success` is false.
    pub error_message: String,
    /// When the entry was stored.
    pub created_at: DateTime<Utc>,
    /// When the audited action was initiated.
    pub requested_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Who performed the action, for display.
    pub fn actor_display(&self) -> String {
        match (&self.actor_label, &self.ip_address) {
            (Some(label), _) if !label.is_empty() => label.clone(),
            (_, Some(ip)) if !ip.is_empty() => format!("Anonymous ({ip})"),
            _ => "System".to_string(),
        }
    }

    /// One-line rendering of `changes`.
    pub fn changes_summary(&self) -> String {
        summarize(&self.changes)
    }

    /// Whether the entry is error or critical.
    pub fn is_high_severity(&self) -> bool {
        self.severity.is_high()
    }
}

/// A fully resolved entry ready for insertion. Identity, `seq` and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub entity_kind: EntityKind,
    pub entity_id: Option<String>,
    pub actor_id: Option<Uuid>,
    pub actor_label: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_key: Option<String>,
    pub description: String,
    pub payload: JsonMap,
    pub changes: AuditChanges,
    pub severity: Severity,
    pub success: bool,
    pub error_message: String,
    pub requested_at: DateTime<Utc>,
}

impl NewAuditEntry {
    /// Materialize the stored row.
    pub fn into_entry(self, id: Uuid, seq: i64, created_at: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            seq,
            action: self.action,
            entity_kind: self.entity_kind,
            entity_id: self.entity_id,
            actor_id: self.actor_id,
            actor_label: self.actor_label,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            session_key: self.session_key,
            description: self.description,
            payload: self.payload,
            changes: self.changes,
            severity: self.severity,
            success: self.success,
            error_message: self.error_message,
            created_at,
            requested_at: self.requested_at,
        }
    }
}

/// Supported audit orderings. Every ordering falls back to `seq` in the
/// same direction so that equal keys come back in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuditOrdering {
    /// Newest first.
    #[default]
    CreatedDesc,
    /// Oldest first.
    CreatedAsc,
    /// Most severe first.
    SeverityDesc,
    /// Least severe first.
    SeverityAsc,
}

impl AuditOrdering {
    /// Direction of the primary key.
    pub fn direction(&self) -> SortDirection {
        match self {
            Self::CreatedDesc | Self::SeverityDesc => SortDirection::Desc,
            Self::CreatedAsc | Self::SeverityAsc => SortDirection::Asc,
        }
    }

    /// SQL `ORDER BY` clause (trusted, never built from input).
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_at DESC, seq DESC",
            Self::CreatedAsc => "created_at ASC, seq ASC",
            Self::SeverityDesc => "severity_rank DESC, seq DESC",
            Self::SeverityAsc => "severity_rank ASC, seq ASC",
        }
    }

    /// Compare two entries under this ordering.
    pub fn compare(&self, a: &AuditEntry, b: &AuditEntry) -> Ordering {
        let primary = match self {
            Self::CreatedDesc | Self::CreatedAsc => a.created_at.cmp(&b.created_at),
            Self::SeverityDesc | Self::SeverityAsc => a.severity.cmp(&b.severity),
        };
        self.direction().apply(primary.then_with(|| a.seq.cmp(&b.seq)))
    }
}

impl FromStr for AuditOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-created_at" => Ok(Self::CreatedDesc),
            "created_at" => Ok(Self::CreatedAsc),
            "-severity" => Ok(Self::SeverityDesc),
            "severity" => Ok(Self::SeverityAsc),
            other => Err(AppError::validation(format!(
                "Invalid ordering: '{other}'. Expected one of: -created_at, created_at, -severity, severity"
            ))),
        }
    }
}

/// Filters for listing audit entries.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub entity_kind: Option<EntityKind>,
    pub severity: Option<Severity>,
    pub success: Option<bool>,
    pub actor_id: Option<Uuid>,
    /// Case-insensitive substring over description, entity id and actor label.
    pub search: Option<String>,
    pub ordering: AuditOrdering,
    pub page: PageRequest,
}

impl AuditQuery {
    /// Trimmed, non-empty search term.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Whether an entry passes every filter.
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if self.action.is_some_and(|a| a != entry.action)
            || self.entity_kind.is_some_and(|k| k != entry.entity_kind)
            || self.severity.is_some_and(|s| s != entry.severity)
            || self.success.is_some_and(|s| s != entry.success)
            || self.actor_id.is_some_and(|id| Some(id) != entry.actor_id)
        {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                let hit = |s: &str| s.to_lowercase().contains(&term);
                hit(&entry.description)
                    || entry.entity_id.as_deref().is_some_and(hit)
                    || entry.actor_label.as_deref().is_some_and(hit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(seq: i64, severity: Severity) -> AuditEntry {
        NewAuditEntry {
            action: AuditAction::Update,
            entity_kind: EntityKind::Article,
            entity_id: Some("42".into()),
            actor_id: None,
            actor_label: Some("editor@example.com".into()),
            ip_address: None,
            user_agent: None,
            session_key: None,
            description: "Update article 42".into(),
            payload: JsonMap::new(),
            changes: AuditChanges::new(),
            severity,
            success: true,
            error_message: String::new(),
            requested_at: Utc::now(),
        }
        .into_entry(Uuid::new_v4(), seq, DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn test_equal_timestamps_fall_back_to_seq() {
        let a = entry(1, Severity::Info);
        let b = entry(2, Severity::Info);
        assert_eq!(AuditOrdering::CreatedDesc.compare(&a, &b), Ordering::Greater);
        assert_eq!(AuditOrdering::CreatedAsc.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_severity_desc_puts_critical_first() {
        let a = entry(1, Severity::Critical);
        let b = entry(2, Severity::Info);
        assert_eq!(AuditOrdering::SeverityDesc.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_search_covers_actor_label() {
        let q = AuditQuery {
            search: Some("EDITOR@".into()),
            ..Default::default()
        };
        assert!(q.matches(&entry(1, Severity::Info)));
        let q = AuditQuery {
            search: Some("nobody".into()),
            ..Default::default()
        };
        assert!(!q.matches(&entry(1, Severity::Info)));
    }

    #[test]
    fn test_actor_display() {
        let mut e = entry(1, Severity::Info);
        assert_eq!(e.actor_display(), "editor@example.com");
        e.actor_label = None;
        assert_eq!(e.actor_display(), "System");
        e.ip_address = Some("10.0.0.1".into());
        assert_eq!(e.actor_display(), "Anonymous (10.0.0.1)");
    }
}
