//! Persisted health probe outcomes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use folio_core::AppError;
use folio_core::types::JsonMap;

/// Which probe produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Database,
    Cache,
    Storage,
    ExternalApi,
    BackgroundWorker,
    /// Aggregate of every sub-check.
    Full,
}

impl CheckKind {
    /// Stored (wire) form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Cache => "cache",
            Self::Storage => "storage",
            Self::ExternalApi => "external_api",
            Self::BackgroundWorker => "background_worker",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "database" => Ok(Self::Database),
            "cache" => Ok(Self::Cache),
            "storage" => Ok(Self::Storage),
            "external_api" => Ok(Self::ExternalApi),
            "background_worker" => Ok(Self::BackgroundWorker),
            "full" => Ok(Self::Full),
            _ => Err(AppError::validation(format!("Invalid check kind: '{s}'"))),
        }
    }
}

impl TryFrom<String> for CheckKind {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An immutable health probe outcome.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthCheckResult {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub check_kind: CheckKind,
    pub success: bool,
    /// Wall-clock duration of the probe.
    pub response_time_ms: f64,
    pub error_message: String,
    pub hostname: String,
    /// Version of the running server build.
    pub runtime_version: String,
    pub os_version: String,
    /// Per sub-check results: `{checks: {name: bool}, details: {name: ..}}`.
    #[sqlx(json)]
    pub metadata: JsonMap,
    pub created_at: DateTime<Utc>,
}

/// Data required to store a health probe outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHealthCheckResult {
    pub check_kind: CheckKind,
    pub success: bool,
    pub response_time_ms: f64,
    pub error_message: String,
    pub hostname: String,
    pub runtime_version: String,
    pub os_version: String,
    pub metadata: JsonMap,
}

impl NewHealthCheckResult {
    /// Materialize the stored row.
    pub fn into_result(self, id: Uuid, created_at: DateTime<Utc>) -> HealthCheckResult {
        HealthCheckResult {
            id,
            check_kind: self.check_kind,
            success: self.success,
            response_time_ms: self.response_time_ms,
            error_message: self.error_message,
            hostname: self.hostname,
            runtime_version: self.runtime_version,
            os_version: self.os_version,
            metadata: self.metadata,
            created_at,
        }
    }
}
