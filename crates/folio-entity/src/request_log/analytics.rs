//! Aggregates over a telemetry window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request count and mean latency for one `(method, path)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStat {
    pub method: String,
    pub path: String,
    pub count: u64,
    pub avg_response_time_ms: f64,
}

/// Number of requests that ended with a given error status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status_code: i32,
    pub count: u64,
}

/// Raw figures for a window as produced by a store. Lists are unordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowAggregate {
    pub total: u64,
    /// Requests with `status < 400`.
    pub success: u64,
    pub avg_response_time_ms: Option<f64>,
    pub min_response_time_ms: Option<f64>,
    pub max_response_time_ms: Option<f64>,
    pub endpoints: Vec<EndpointStat>,
    /// Requests with `status >= 400`, grouped by status.
    pub errors: Vec<StatusCount>,
}

/// Rollup returned to the admin analytics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub window_days: u32,
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    /// Percentage with two decimals; `0.0` for an empty window.
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub top_endpoints: Vec<EndpointStat>,
    pub error_breakdown: Vec<StatusCount>,
}
