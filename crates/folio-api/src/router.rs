//! Route definitions for the Folio HTTP API.
//!
//! Everything is mounted under `/api`; admin routes additionally under
//! `/api/admin`. The telemetry middleware wraps every route.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and the telemetry middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(public_routes())
        .nest("/admin", admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::telemetry::record_request,
        ))
        .with_state(state)
}

/// Unauthenticated endpoints
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/system-info", get(handlers::health::system_info))
}

/// Admin endpoints: audit, settings, telemetry, health history, stats
fn admin_routes() -> Router<AppState> {
    use handlers::admin::{actors, api_logs, audit, health_checks, settings, stats};

    Router::new()
        .route(
            "/audit-logs",
            get(audit::list_audit_logs).post(audit::record_audit_log),
        )
        .route("/audit-logs/{id}", get(audit::get_audit_log))
        .route(
            "/settings/system",
            get(settings::get_system).put(settings::update_system),
        )
        .route(
            "/settings/contact",
            get(settings::get_contact).put(settings::update_contact),
        )
        .route(
            "/settings/about",
            get(settings::get_about).put(settings::update_about),
        )
        .route("/stats", get(stats::get_stats))
        .route("/api-logs", get(api_logs::list_api_logs))
        .route("/api-logs/{id}", get(api_logs::get_api_log))
        .route("/api-analytics", get(api_logs::api_analytics))
        .route("/health-checks", get(health_checks::list_health_checks))
        .route("/actors/{id}/detach", post(actors::detach_actor))
}
