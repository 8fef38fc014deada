//! Public handlers: the health probe and the system-info projection.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use folio_entity::settings::SystemInfo;

use crate::dto::{ApiResponse, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
///
/// Runs every registered check. Always answers, with 503 when any check
/// failed.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.health.check().await;
    let status = if report.overall {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::from(&report)))
}

/// GET /api/system-info
pub async fn system_info(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SystemInfo>>, ApiError> {
    let info = state.settings.system_info().await?;
    Ok(Json(ApiResponse::ok(info)))
}
