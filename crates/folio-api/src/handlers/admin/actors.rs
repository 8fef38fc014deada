//! Actor lifecycle hook called by the account collaborator.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use crate::dto::{ApiResponse, DetachResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_uuid};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/actors/{id}/detach
///
/// Clears the actor reference on the audit trail and request telemetry of
/// a deleted account. Labels are kept.
pub async fn detach_actor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DetachResponse>>, ApiError> {
    require_admin(&auth)?;
    let actor_id = parse_uuid(&id)?;

    let audit_entries = state.audit.detach_actor(actor_id).await?;
    let api_requests = state.telemetry.detach_actor(actor_id).await?;
    info!(%actor_id, audit_entries, api_requests, "Detached actor references");

    Ok(Json(ApiResponse::ok(DetachResponse {
        actor_id,
        audit_entries,
        api_requests,
    })))
}
