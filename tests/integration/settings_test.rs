//! Integration tests for the settings singletons and system-info.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{TestActor, TestApp};

#[tokio::test]
async fn test_system_info_is_public_and_defaulted() {
    let app = TestApp::new().await;

    let response = app.get("/api/system-info", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["site_name"], "Jamngeny Vision");
    assert_eq!(response.data()["maintenance_mode"], false);
    assert!(response.data().get("custom_js").is_none());
}

#[tokio::test]
async fn test_update_preserves_identity_and_refreshes_cache() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    // Warm the cache.
    app.get("/api/system-info", None).await;
    let before = app.get("/api/admin/settings/system", Some(&admin)).await;
    let id = before.data()["id"].clone();

    let response = app
        .request(
            "PUT",
            "/api/admin/settings/system",
            Some(json!({"site_name": "X", "maintenance_mode": true})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], id);
    assert_eq!(response.data()["site_name"], "X");

    let info = app.get("/api/system-info", None).await;
    assert_eq!(info.data()["site_name"], "X");
    assert_eq!(info.data()["maintenance_mode"], true);
}

#[tokio::test]
async fn test_update_is_audited_with_changes() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    app.request(
        "PUT",
        "/api/admin/settings/system",
        Some(json!({"site_name": "X"})),
        Some(&admin),
    )
    .await;

    let response = app
        .get("/api/admin/audit-logs?entity_kind=system", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    let entry = &items[0];
    assert_eq!(entry["action"], "update");
    assert_eq!(entry["description"], "Update system settings");
    assert_eq!(entry["actor_label"], "admin@example.com");
    assert_eq!(entry["ip_address"], "203.0.113.7");
    assert_eq!(entry["changes"]["site_name"]["before"], "Jamngeny Vision");
    assert_eq!(entry["changes"]["site_name"]["after"], "X");
    assert!(entry["changes"].get("cache_timeout").is_none());
}

#[tokio::test]
async fn test_invalid_update_rejected_and_row_untouched() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let response = app
        .request(
            "PUT",
            "/api/admin/settings/system",
            Some(json!({"contact_email": "not-an-email"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    let fields: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"contact_email"));

    let current = app.get("/api/admin/settings/system", Some(&admin)).await;
    assert_ne!(current.data()["contact_email"], "not-an-email");
}

#[tokio::test]
async fn test_contact_and_about_round_trip() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();

    let contact = app
        .request(
            "PUT",
            "/api/admin/settings/contact",
            Some(json!({"notification_emails": "a@example.com, b@example.com"})),
            Some(&admin),
        )
        .await;
    assert_eq!(contact.status, StatusCode::OK);
    assert_eq!(
        contact.data()["notification_emails"],
        "a@example.com, b@example.com"
    );

    let about = app
        .request(
            "PUT",
            "/api/admin/settings/about",
            Some(json!({"title": "About us"})),
            Some(&admin),
        )
        .await;
    assert_eq!(about.status, StatusCode::OK);
    assert_eq!(about.data()["title"], "About us");

    let fetched = app.get("/api/admin/settings/about", Some(&admin)).await;
    assert_eq!(fetched.data()["id"], about.data()["id"]);
}
