//! Integration tests for the audit trail endpoints.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::{TestActor, TestApp};

#[tokio::test]
async fn test_record_fills_defaults_from_request() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let response = app
        .request(
            "POST",
            "/api/admin/audit-logs",
            Some(json!({"action": "create", "entity_kind": "article", "entity_id": "42"})),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let entry = response.data();
    assert_eq!(entry["description"], "Create article 42");
    assert_eq!(entry["severity"], "info");
    assert_eq!(entry["success"], true);
    assert_eq!(entry["actor_id"], admin.id.to_string());
    assert_eq!(entry["user_agent"], "folio-tests");
    assert_eq!(entry["ip_address"], "203.0.113.7");

    let id = entry["id"].as_str().unwrap();
    let fetched = app
        .get(&format!("/api/admin/audit-logs/{id}"), Some(&admin))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["description"], "Create article 42");
}

#[tokio::test]
async fn test_legacy_changes_normalized() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let response = app
        .request(
            "POST",
            "/api/admin/audit-logs",
            Some(json!({
                "action": "update",
                "entity_kind": "article",
                "entity_id": "7",
                "changes": {"title": ["Old", "New"]}
            })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["changes"]["title"]["before"], "Old");
    assert_eq!(response.data()["changes"]["title"]["after"], "New");
}

#[tokio::test]
async fn test_query_filters_and_stable_order() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    for (action, severity) in [
        ("login", "info"),
        ("delete", "critical"),
        ("update", "warning"),
        ("delete", "error"),
    ] {
        app.request(
            "POST",
            "/api/admin/audit-logs",
            Some(json!({"action": action, "entity_kind": "article", "severity": severity})),
            Some(&admin),
        )
        .await;
    }

    let deletes = app
        .get("/api/admin/audit-logs?action=delete", Some(&admin))
        .await;
    assert_eq!(deletes.data()["total_items"], 2);

    let path = "/api/admin/audit-logs?ordering=-severity";
    let first = app.get(path, Some(&admin)).await;
    let second = app.get(path, Some(&admin)).await;
    let severities: Vec<&str> = first.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["severity"].as_str().unwrap())
        .collect();
    assert_eq!(severities, vec!["critical", "error", "warning", "info"]);
    assert_eq!(first.data()["items"], second.data()["items"]);
}

#[tokio::test]
async fn test_bad_ordering_and_missing_entry() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let response = app
        .get("/api/admin/audit-logs?ordering=priority", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .get(
            &format!("/api/admin/audit-logs/{}", Uuid::new_v4()),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_detach_actor_keeps_labels() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();
    let departing = TestActor::admin();

    app.request(
        "POST",
        "/api/admin/audit-logs",
        Some(json!({"action": "login", "entity_kind": "auth"})),
        Some(&departing),
    )
    .await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/actors/{}/detach", departing.id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["audit_entries"], 1);
    // The departing actor's POST was recorded by telemetry too.
    assert_eq!(response.data()["api_requests"], 1);

    let logs = app
        .get("/api/admin/audit-logs?action=login", Some(&admin))
        .await;
    let entry = &logs.data()["items"][0];
    assert!(entry["actor_id"].is_null());
    assert_eq!(entry["actor_label"], "admin@example.com");
}
