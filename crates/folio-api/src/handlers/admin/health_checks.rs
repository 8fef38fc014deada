//! Health probe history handler.

use axum::Json;
use axum::extract::State;

use folio_core::types::PageResponse;
use folio_entity::health::HealthCheckResult;

use crate::dto::{ApiResponse, HealthHistoryParams};
use crate::error::ApiError;
use crate::extractors::{ApiQuery, AuthUser};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/health-checks
pub async fn list_health_checks(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<HealthHistoryParams>,
) -> Result<Json<ApiResponse<PageResponse<HealthCheckResult>>>, ApiError> {
    require_admin(&auth)?;
    let page = state
        .health
        .history(params.check_kind, params.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}
