//! Integration tests for identity handling on the admin surface.

use http::StatusCode;

use crate::helpers::{TestActor, TestApp};

#[tokio::test]
async fn test_admin_routes_require_identity() {
    let app = TestApp::new().await;

    let response = app.get("/api/admin/stats", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert_eq!(response.body["message"], "Authentication required");
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new().await;
    let editor = TestActor::editor();

    for path in [
        "/api/admin/audit-logs",
        "/api/admin/settings/system",
        "/api/admin/api-logs",
        "/api/admin/api-analytics",
        "/api/admin/health-checks",
        "/api/admin/stats",
    ] {
        let response = app.get(path, Some(&editor)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(response.body["error"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn test_malformed_identity_rejected() {
    let app = TestApp::new().await;
    let mut admin = TestActor::admin();
    admin.label = String::new();

    let response = app.get("/api/admin/stats", Some(&admin)).await;
    // An empty label falls back to the id.
    assert_eq!(response.status, StatusCode::OK);

    let req = http::Request::builder()
        .uri("/api/admin/stats")
        .header("x-actor-id", "not-a-uuid")
        .header("x-actor-role", "admin")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), req)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
