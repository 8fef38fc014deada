//! Integration tests for the dashboard statistics endpoint.

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use folio_database::memory::ContentItem;

use crate::helpers::{TestActor, TestApp};

#[tokio::test]
async fn test_stats_counts_content_and_trails() {
    let app = TestApp::new().await;
    let admin = TestActor::admin();
    let now = Utc::now();
    let old = now - Duration::days(30);

    app.content.add(ContentItem::User { created_at: now }).await;
    app.content.add(ContentItem::User { created_at: old }).await;
    app.content
        .add(ContentItem::Article {
            created_at: now,
            published: true,
        })
        .await;
    app.content
        .add(ContentItem::Article {
            created_at: old,
            published: false,
        })
        .await;
    app.content
        .add(ContentItem::ContactMessage {
            created_at: now,
            unread: true,
        })
        .await;
    app.content
        .add(ContentItem::File {
            created_at: now,
            size: 2048,
        })
        .await;

    app.request(
        "POST",
        "/api/admin/audit-logs",
        Some(json!({"action": "publish", "entity_kind": "article", "entity_id": "1"})),
        Some(&admin),
    )
    .await;

    let response = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);

    let stats = response.data();
    assert_eq!(stats["totals"]["users"], 2);
    assert_eq!(stats["totals"]["articles"], 2);
    assert_eq!(stats["totals"]["published_articles"], 1);
    assert_eq!(stats["totals"]["unread_messages"], 1);
    assert_eq!(stats["totals"]["files"], 1);
    assert_eq!(stats["totals"]["total_file_size"], 2048);
    assert_eq!(stats["totals"]["audit_entries"], 1);
    // The audit POST is the only request recorded before the snapshot.
    assert_eq!(stats["totals"]["api_requests"], 1);
    assert_eq!(stats["recent"]["users"], 1);
    assert_eq!(stats["recent"]["articles"], 1);
    // Sampling is disabled in tests.
    assert!(stats["resources"].is_null());
    assert_eq!(stats["database_size"], "Unknown");
}
