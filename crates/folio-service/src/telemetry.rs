//! Per-request telemetry and rollup analytics.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use folio_core::config::TelemetryConfig;
use folio_core::error::{AppError, FieldError};
use folio_core::result::AppResult;
use folio_core::types::{JsonMap, PageResponse};
use folio_database::store::RequestLogStore;
use folio_entity::request_log::{
    AnalyticsReport, ApiRequestRecord, NewApiRequestRecord, RequestLogQuery,
};
use folio_entity::user::Actor;

use crate::resources::round2;

/// Longest analytics window accepted, in days.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// What arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub query_params: JsonMap,
    pub user_agent: String,
    pub ip_address: String,
    pub requested_at: DateTime<Utc>,
}

/// What was sent back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub status_code: u16,
    pub response_size: u64,
}

/// Optional attributes of a request record. Defaults: anonymous, no error,
/// empty metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub actor: Option<Actor>,
    pub error_message: Option<String>,
    pub exception_kind: Option<String>,
    pub metadata: JsonMap,
}

/// Records requests and rolls them up.
#[derive(Debug, Clone)]
pub struct TelemetryService {
    store: Arc<dyn RequestLogStore>,
    config: TelemetryConfig,
}

impl TelemetryService {
    /// Creates a new telemetry service.
    pub fn new(store: Arc<dyn RequestLogStore>, config: TelemetryConfig) -> Self {
        Self { store, config }
    }

    /// Whether a request to `path` should be recorded at all.
    pub fn should_record(&self, path: &str) -> bool {
        self.config.enabled && !self.config.is_excluded(path)
    }

    /// Appends one record.
    pub async fn record(
        &self,
        request: RequestInfo,
        response: ResponseInfo,
        elapsed_ms: f64,
        options: RequestOptions,
    ) -> AppResult<ApiRequestRecord> {
        let (actor_id, actor_label) = match options.actor {
            Some(actor) => (Some(actor.id), Some(actor.label)),
            None => (None, None),
        };

        let record = NewApiRequestRecord {
            method: request.method,
            path: request.path,
            query_params: request.query_params,
            user_agent: request.user_agent,
            ip_address: request.ip_address,
            is_authenticated: actor_id.is_some(),
            actor_id,
            actor_label,
            status_code: i32::from(response.status_code),
            response_size: i64::try_from(response.response_size).unwrap_or(i64::MAX),
            response_time_ms: round2(elapsed_ms.max(0.0)),
            error_message: options.error_message.unwrap_or_default(),
            exception_kind: options.exception_kind.unwrap_or_default(),
            metadata: options.metadata,
            requested_at: request.requested_at,
        };

        let stored = self.store.insert(record).await?;
        debug!(
            method = %stored.method,
            path = %stored.path,
            status = stored.status_code,
            "Recorded API request"
        );
        Ok(stored)
    }

    /// Like [`record`](Self::record), but a failure is logged and swallowed.
    pub async fn record_or_warn(
        &self,
        request: RequestInfo,
        response: ResponseInfo,
        elapsed_ms: f64,
        options: RequestOptions,
    ) -> Option<ApiRequestRecord> {
        let (method, path) = (request.method.clone(), request.path.clone());
        match self.record(request, response, elapsed_ms, options).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(method = %method, path = %path, error = %e, "Failed to record API request");
                None
            }
        }
    }

    /// Analytics over the configured default window.
    pub async fn default_analytics(&self) -> AppResult<AnalyticsReport> {
        self.analytics(self.config.default_window_days, self.config.top_endpoints)
            .await
    }

    /// Rollup of the records created in the last `window_days` days.
    pub async fn analytics(&self, window_days: u32, top_n: usize) -> AppResult<AnalyticsReport> {
        if window_days == 0 || window_days > MAX_WINDOW_DAYS {
            return Err(AppError::invalid_fields(vec![
                FieldError::new("days", "range").with_message(format!(
                    "must be between 1 and {MAX_WINDOW_DAYS}"
                )),
            ]));
        }

        let window_end = Utc::now();
        let window_start = window_end - Duration::days(i64::from(window_days));
        let mut agg = self.store.aggregate_window(window_start, top_n).await?;

        agg.endpoints.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| a.method.cmp(&b.method))
        });
        agg.endpoints.truncate(top_n);
        for endpoint in &mut agg.endpoints {
            endpoint.avg_response_time_ms = round2(endpoint.avg_response_time_ms);
        }
        agg.errors.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.status_code.cmp(&b.status_code))
        });

        let success_rate = if agg.total == 0 {
            0.0
        } else {
            round2(agg.success as f64 / agg.total as f64 * 100.0)
        };

        Ok(AnalyticsReport {
            window_start,
            window_end,
            window_days,
            total_requests: agg.total,
            success_count: agg.success,
            error_count: agg.total - agg.success,
            success_rate,
            avg_response_time_ms: round2(agg.avg_response_time_ms.unwrap_or(0.0)),
            min_response_time_ms: agg.min_response_time_ms.unwrap_or(0.0),
            max_response_time_ms: agg.max_response_time_ms.unwrap_or(0.0),
            top_endpoints: agg.endpoints,
            error_breakdown: agg.errors,
        })
    }

    /// Filters, orders and pages records.
    pub async fn query(&self, query: &RequestLogQuery) -> AppResult<PageResponse<ApiRequestRecord>> {
        self.store.search(query).await
    }

    /// Fetches one record.
    pub async fn get(&self, id: Uuid) -> AppResult<ApiRequestRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("API request log {id} not found")))
    }

    /// Nulls the actor reference of every record by `actor_id`.
    pub async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64> {
        self.store.detach_actor(actor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use folio_core::error::ErrorKind;
    use folio_database::memory::MemoryRequestLogStore;
    use folio_entity::request_log::{RequestOrdering, StatusCount};
    use folio_entity::user::UserRole;

    fn service() -> TelemetryService {
        TelemetryService::new(
            Arc::new(MemoryRequestLogStore::new()),
            TelemetryConfig::default(),
        )
    }

    fn request(method: &str, path: &str) -> RequestInfo {
        RequestInfo {
            method: method.to_string(),
            path: path.to_string(),
            query_params: JsonMap::new(),
            user_agent: "test-agent".to_string(),
            ip_address: "127.0.0.1".to_string(),
            requested_at: Utc::now(),
        }
    }

    async fn hit(svc: &TelemetryService, method: &str, path: &str, status: u16, ms: f64) {
        svc.record(
            request(method, path),
            ResponseInfo {
                status_code: status,
                response_size: 128,
            },
            ms,
            RequestOptions::default(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_empty_window() {
        let report = service().analytics(30, 10).await.unwrap();
        assert_eq!(report.total_requests, 0);
        assert_eq!(report.success_rate, 0.0);
        assert_eq!(report.avg_response_time_ms, 0.0);
        assert!(report.top_endpoints.is_empty());
        assert!(report.error_breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_success_rate_and_error_breakdown() {
        let svc = service();
        for _ in 0..7 {
            hit(&svc, "GET", "/api/articles", 200, 10.0).await;
        }
        for _ in 0..3 {
            hit(&svc, "POST", "/api/contact", 500, 40.0).await;
        }

        let report = svc.analytics(30, 10).await.unwrap();
        assert_eq!(report.total_requests, 10);
        assert_eq!(report.success_count, 7);
        assert_eq!(report.error_count, 3);
        assert_eq!(report.success_rate, 70.0);
        assert_eq!(
            report.error_breakdown,
            vec![StatusCount {
                status_code: 500,
                count: 3
            }]
        );
        assert_eq!(report.avg_response_time_ms, 19.0);
        assert_eq!(report.min_response_time_ms, 10.0);
        assert_eq!(report.max_response_time_ms, 40.0);
        assert_eq!(report.top_endpoints[0].path, "/api/articles");
        assert_eq!(report.top_endpoints[0].count, 7);
    }

    #[tokio::test]
    async fn test_top_endpoints_tie_break() {
        let svc = service();
        hit(&svc, "POST", "/b", 200, 1.0).await;
        hit(&svc, "GET", "/b", 200, 1.0).await;
        hit(&svc, "GET", "/a", 200, 1.0).await;
        hit(&svc, "GET", "/c", 200, 1.0).await;
        hit(&svc, "GET", "/c", 200, 1.0).await;

        let report = svc.analytics(1, 3).await.unwrap();
        let order: Vec<(String, String)> = report
            .top_endpoints
            .iter()
            .map(|e| (e.method.clone(), e.path.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("GET".to_string(), "/c".to_string()),
                ("GET".to_string(), "/a".to_string()),
                ("GET".to_string(), "/b".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_window_rejected() {
        let err = service().analytics(0, 10).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field_errors()[0].field, "days");
    }

    #[tokio::test]
    async fn test_authenticated_flag_follows_actor() {
        let svc = service();
        let actor = Actor::new(Uuid::new_v4(), "ops@example.com", UserRole::Editor);
        let record = svc
            .record(
                request("GET", "/api/admin/stats"),
                ResponseInfo {
                    status_code: 200,
                    response_size: 10,
                },
                3.456,
                RequestOptions {
                    actor: Some(actor.clone()),
                    ..RequestOptions::default()
                },
            )
            .await
            .unwrap();
        assert!(record.is_authenticated);
        assert_eq!(record.actor_label.as_deref(), Some("ops@example.com"));
        assert_eq!(record.response_time_ms, 3.46);

        assert_eq!(svc.detach_actor(actor.id).await.unwrap(), 1);
        assert!(svc.get(record.id).await.unwrap().actor_id.is_none());
    }

    #[tokio::test]
    async fn test_query_by_status() {
        let svc = service();
        hit(&svc, "GET", "/ok", 200, 5.0).await;
        hit(&svc, "GET", "/missing", 404, 1.0).await;

        let page = svc
            .query(&RequestLogQuery {
                status_code: Some(404),
                ordering: RequestOrdering::default(),
                ..RequestLogQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].path, "/missing");
    }

    #[test]
    fn test_excluded_paths_skipped() {
        let svc = service();
        assert!(svc.should_record("/api/health"));
        assert!(!svc.should_record("/static/app.css"));
    }
}
