//! One row per handled HTTP request.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use folio_core::AppError;
use folio_core::types::{JsonMap, PageRequest, SortDirection};

/// An immutable record of a handled request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiRequestRecord {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    #[sqlx(json)]
    pub query_params: JsonMap,
    pub user_agent: String,
    pub ip_address: String,
    /// Acting account; nulled when the account is removed.
    pub actor_id: Option<Uuid>,
    pub actor_label: Option<String>,
    pub is_authenticated: bool,
    pub status_code: i32,
    /// Response body size in bytes.
    pub response_size: i64,
    pub response_time_ms: f64,
    pub error_message: String,
    pub exception_kind: String,
    #[sqlx(json)]
    pub metadata: JsonMap,
    pub created_at: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

impl ApiRequestRecord {
    /// `status < 400`.
    pub fn is_success(&self) -> bool {
        self.status_code < 400
    }
}

/// Data required to store a request record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApiRequestRecord {
    pub method: String,
    pub path: String,
    pub query_params: JsonMap,
    pub user_agent: String,
    pub ip_address: String,
    pub actor_id: Option<Uuid>,
    pub actor_label: Option<String>,
    pub is_authenticated: bool,
    pub status_code: i32,
    pub response_size: i64,
    pub response_time_ms: f64,
    pub error_message: String,
    pub exception_kind: String,
    pub metadata: JsonMap,
    pub requested_at: DateTime<Utc>,
}

impl NewApiRequestRecord {
    /// Materialize the stored row.
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> ApiRequestRecord {
        ApiRequestRecord {
            id,
            method: self.method,
            path: self.path,
            query_params: self.query_params,
            user_agent: self.user_agent,
            ip_address: self.ip_address,
            actor_id: self.actor_id,
            actor_label: self.actor_label,
            is_authenticated: self.is_authenticated,
            status_code: self.status_code,
            response_size: self.response_size,
            response_time_ms: self.response_time_ms,
            error_message: self.error_message,
            exception_kind: self.exception_kind,
            metadata: self.metadata,
            created_at,
            requested_at: self.requested_at,
        }
    }
}

/// Supported request log orderings. Ties fall back to `(created_at, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestOrdering {
    #[default]
    CreatedDesc,
    CreatedAsc,
    ResponseTimeDesc,
    ResponseTimeAsc,
    StatusDesc,
    StatusAsc,
}

impl RequestOrdering {
    /// Direction of the primary key.
    pub fn direction(&self) -> SortDirection {
        match self {
            Self::CreatedDesc | Self::ResponseTimeDesc | Self::StatusDesc => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    /// SQL `ORDER BY` clause (trusted, never built from input).
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_at DESC, id DESC",
            Self::CreatedAsc => "created_at ASC, id ASC",
            Self::ResponseTimeDesc => "response_time_ms DESC, created_at DESC, id DESC",
            Self::ResponseTimeAsc => "response_time_ms ASC, created_at ASC, id ASC",
            Self::StatusDesc => "status_code DESC, created_at DESC, id DESC",
            Self::StatusAsc => "status_code ASC, created_at ASC, id ASC",
        }
    }

    /// Compare two records under this ordering.
    pub fn compare(&self, a: &ApiRequestRecord, b: &ApiRequestRecord) -> Ordering {
        let primary = match self {
            Self::CreatedDesc | Self::CreatedAsc => Ordering::Equal,
            Self::ResponseTimeDesc | Self::ResponseTimeAsc => {
                a.response_time_ms.total_cmp(&b.response_time_ms)
            }
            Self::StatusDesc | Self::StatusAsc => a.status_code.cmp(&b.status_code),
        };
        self.direction().apply(
            primary
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id)),
        )
    }
}

impl FromStr for RequestOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-created_at" => Ok(Self::CreatedDesc),
            "created_at" => Ok(Self::CreatedAsc),
            "-response_time" => Ok(Self::ResponseTimeDesc),
            "response_time" => Ok(Self::ResponseTimeAsc),
            "-status_code" => Ok(Self::StatusDesc),
            "status_code" => Ok(Self::StatusAsc),
            other => Err(AppError::validation(format!("Invalid ordering: '{other}'"))),
        }
    }
}

/// Filters for listing request records.
#[derive(Debug, Clone, Default)]
pub struct RequestLogQuery {
    /// Upper-case HTTP method.
    pub method: Option<String>,
    pub status_code: Option<i32>,
    pub is_authenticated: Option<bool>,
    /// Case-insensitive substring over path, IP and actor label.
    pub search: Option<String>,
    pub ordering: RequestOrdering,
    pub page: PageRequest,
}

impl RequestLogQuery {
    /// Trimmed, non-empty search term.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Whether a record passes every filter.
    pub fn matches(&self, record: &ApiRequestRecord) -> bool {
        if self
            .method
            .as_deref()
            .is_some_and(|m| !m.eq_ignore_ascii_case(&record.method))
            || self.status_code.is_some_and(|s| s != record.status_code)
            || self
                .is_authenticated
                .is_some_and(|a| a != record.is_authenticated)
        {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.path.to_lowercase().contains(&term)
                    || record.ip_address.to_lowercase().contains(&term)
                    || record
                        .actor_label
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&term))
            }
        }
    }
}
