//! Integration tests for request telemetry and analytics.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::StatusCode;
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_core::types::PageResponse;
use folio_database::store::RequestLogStore;
use folio_entity::request_log::{
    ApiRequestRecord, NewApiRequestRecord, RequestLogQuery, WindowAggregate,
};

use crate::helpers::{TestActor, TestApp};

/// Request log whose inserts never complete.
#[derive(Debug)]
struct StalledRequestLog;

#[async_trait]
impl RequestLogStore for StalledRequestLog {
    async fn insert(&self, _record: NewApiRequestRecord) -> AppResult<ApiRequestRecord> {
        std::future::pending().await
    }

    async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<ApiRequestRecord>> {
        Ok(None)
    }

    async fn search(&self, query: &RequestLogQuery) -> AppResult<PageResponse<ApiRequestRecord>> {
        Ok(PageResponse::new(Vec::new(), query.page, 0))
    }

    async fn count_since(&self, _since: Option<DateTime<Utc>>) -> AppResult<u64> {
        Ok(0)
    }

    async fn aggregate_window(
        &self,
        _since: DateTime<Utc>,
        _top_n: usize,
    ) -> AppResult<WindowAggregate> {
        Ok(WindowAggregate::default())
    }

    async fn detach_actor(&self, _actor_id: Uuid) -> AppResult<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_requests_are_recorded_with_outcome() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    app.get("/api/system-info?lang=en", None).await;
    app.get("/api/admin/stats", None).await;

    let response = app
        .get("/api/admin/api-logs?ordering=created_at", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let ok = &items[0];
    assert_eq!(ok["method"], "GET");
    assert_eq!(ok["path"], "/api/system-info");
    assert_eq!(ok["status_code"], 200);
    assert_eq!(ok["query_params"]["lang"], "en");
    assert_eq!(ok["ip_address"], "203.0.113.7");
    assert_eq!(ok["user_agent"], "folio-tests");
    assert_eq!(ok["is_authenticated"], false);
    assert!(ok["response_size"].as_i64().unwrap() > 0);

    let denied = &items[1];
    assert_eq!(denied["status_code"], 401);
    assert_eq!(denied["error_message"], "Authentication required");
    assert_eq!(denied["exception_kind"], "UNAUTHORIZED");

    let id = ok["id"].as_str().unwrap();
    let fetched = app
        .get(&format!("/api/admin/api-logs/{id}"), Some(&admin))
        .await;
    assert_eq!(fetched.data()["path"], "/api/system-info");
}

#[tokio::test]
async fn test_excluded_paths_not_recorded() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let response = app.get("/static/app.css", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let logs = app.get("/api/admin/api-logs", Some(&admin)).await;
    assert_eq!(logs.data()["total_items"], 0);
}

#[tokio::test]
async fn test_analytics_rollup() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    for _ in 0..7 {
        app.get("/api/system-info", None).await;
    }
    for _ in 0..3 {
        app.get("/api/admin/stats", None).await;
    }

    let response = app
        .get("/api/admin/api-analytics?days=30", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let report = response.data();
    assert_eq!(report["total_requests"], 10);
    assert_eq!(report["success_rate"], 70.0);
    assert_eq!(report["error_breakdown"][0]["status_code"], 401);
    assert_eq!(report["error_breakdown"][0]["count"], 3);
    assert_eq!(report["top_endpoints"][0]["path"], "/api/system-info");
    assert_eq!(report["top_endpoints"][0]["count"], 7);
    assert_eq!(report["window_days"], 30);
}

#[tokio::test]
async fn test_analytics_empty_window_and_bounds() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let response = app.get("/api/admin/api-analytics", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_requests"], 0);
    assert_eq!(response.data()["success_rate"], 0.0);

    let response = app
        .get("/api/admin/api-analytics?days=0", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["field"], "days");
}

#[tokio::test]
async fn test_authenticated_requests_carry_actor() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    app.get("/api/admin/stats", Some(&admin)).await;

    let logs = app
        .get("/api/admin/api-logs?is_authenticated=true", Some(&admin))
        .await;
    let items = logs.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["actor_label"], "admin@example.com");
    assert_eq!(items[0]["path"], "/api/admin/stats");
}

#[tokio::test]
async fn test_stalled_request_log_does_not_delay_response() {
    let app = TestApp::with_request_log(
        |config| config.server.request_timeout_seconds = 1,
        Arc::new(StalledRequestLog),
    )
    .await;

    let response = app.get("/api/system-info", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["site_name"], "Jamngeny Vision");
}
