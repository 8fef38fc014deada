//! Request and response DTOs.

pub mod request;
pub mod response;

pub use request::{
    AnalyticsParams, ApiLogParams, AuditLogParams, HealthHistoryParams, RecordAuditRequest,
};
pub use response::{ApiResponse, DetachResponse, HealthResponse};
