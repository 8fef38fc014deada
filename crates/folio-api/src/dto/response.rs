//! Response DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_service::HealthReport;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` or `"unhealthy"`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub response_time_ms: f64,
    pub checks: BTreeMap<String, bool>,
    /// Per-check message or structured reading.
    pub details: BTreeMap<String, serde_json::Value>,
}

impl From<&HealthReport> for HealthResponse {
    fn from(report: &HealthReport) -> Self {
        Self {
            status: report.status().to_string(),
            timestamp: report.timestamp,
            response_time_ms: report.elapsed_ms,
            checks: report.passed_map(),
            details: report.details_map(),
        }
    }
}

/// Outcome of detaching a removed actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetachResponse {
    pub actor_id: Uuid,
    /// Audit entries whose actor reference was cleared.
    pub audit_entries: u64,
    /// Request records whose actor reference was cleared.
    pub api_requests: u64,
}
