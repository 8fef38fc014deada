//! Integration tests for the health probe and its history.

use http::StatusCode;
use serde_json::Value;

use crate::helpers::{TestActor, TestApp};

#[tokio::test]
async fn test_health_all_checks_pass() {
    let app = TestApp::new().await;

    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["checks"]["database"], true);
    assert_eq!(response.body["checks"]["cache"], true);
    assert_eq!(response.body["checks"]["storage"], true);
    assert!(response.body["checks"].get("system_resources").is_none());
    assert!(response.body["response_time_ms"].as_f64().unwrap() >= 0.0);
    assert!(response.body.get("success").is_none());
}

#[tokio::test]
async fn test_storage_failure_flips_only_storage() {
    let app = TestApp::new().await;
    app.break_storage();

    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
    assert_eq!(response.body["checks"]["storage"], false);
    assert_eq!(response.body["checks"]["database"], true);
    assert_eq!(response.body["checks"]["cache"], true);
    assert!(!response.body["details"]["storage"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_database_outage_reported() {
    let app = TestApp::new().await;
    app.probe.set_available(false);

    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["checks"]["database"], false);
    assert_eq!(response.body["checks"]["storage"], true);
}

#[tokio::test]
async fn test_probe_runs_are_persisted() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    app.get("/api/health", None).await;
    app.break_storage();
    app.get("/api/health", None).await;

    let response = app.get("/api/admin/health-checks", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    // Newest first.
    assert_eq!(items[0]["success"], false);
    assert_eq!(items[0]["check_kind"], "full");
    assert_eq!(items[0]["metadata"]["checks"]["storage"], false);
    assert_eq!(items[1]["success"], true);
    assert_eq!(items[1]["error_message"], Value::String(String::new()));
}

#[tokio::test]
async fn test_health_history_filters_by_kind() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();
    app.get("/api/health", None).await;

    let response = app
        .get("/api/admin/health-checks?check_kind=database", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_items"], 0);

    let response = app
        .get("/api/admin/health-checks?check_kind=bogus", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
