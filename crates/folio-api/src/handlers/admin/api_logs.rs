//! Request telemetry handlers.

use axum::Json;
use axum::extract::{Path, State};

use folio_core::types::PageResponse;
use folio_entity::request_log::{AnalyticsReport, ApiRequestRecord};

use crate::dto::{AnalyticsParams, ApiLogParams, ApiResponse};
use crate::error::ApiError;
use crate::extractors::{ApiQuery, AuthUser, parse_uuid};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/api-logs
pub async fn list_api_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ApiLogParams>,
) -> Result<Json<ApiResponse<PageResponse<ApiRequestRecord>>>, ApiError> {
    require_admin(&auth)?;
    let query = params.into_query()?;
    Ok(Json(ApiResponse::ok(state.telemetry.query(&query).await?)))
}

/// GET /api/admin/api-logs/{id}
pub async fn get_api_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ApiRequestRecord>>, ApiError> {
    require_admin(&auth)?;
    let record = state.telemetry.get(parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// GET /api/admin/api-analytics?days=30&top=10
pub async fn api_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<AnalyticsParams>,
) -> Result<Json<ApiResponse<AnalyticsReport>>, ApiError> {
    require_admin(&auth)?;
    let telemetry = &state.config.telemetry;
    let report = state
        .telemetry
        .analytics(
            params.days.unwrap_or(telemetry.default_window_days),
            params.top.unwrap_or(telemetry.top_endpoints),
        )
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
