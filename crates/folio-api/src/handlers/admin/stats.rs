//! Dashboard statistics handler.

use axum::Json;
use axum::extract::State;

use folio_entity::stats::SystemStats;

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<SystemStats>>, ApiError> {
    require_admin(&auth)?;
    let stats = state.stats.snapshot().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
