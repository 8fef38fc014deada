//! Audit log handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use folio_core::types::PageResponse;
use folio_entity::audit::AuditEntry;

use crate::dto::{ApiResponse, AuditLogParams, RecordAuditRequest};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiQuery, AuthUser, parse_uuid};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<AuditLogParams>,
) -> Result<Json<ApiResponse<PageResponse<AuditEntry>>>, ApiError> {
    require_admin(&auth)?;
    let query = params.into_query()?;
    let page = state.audit.query(&query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/admin/audit-logs/{id}
pub async fn get_audit_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AuditEntry>>, ApiError> {
    require_admin(&auth)?;
    let entry = state.audit.get(parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// POST /api/admin/audit-logs
///
/// Appends an entry on behalf of an out-of-process collaborator. Unlike
/// in-process recording, a storage failure is reported to the caller.
pub async fn record_audit_log(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<RecordAuditRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuditEntry>>), ApiError> {
    require_admin(&auth)?;
    let (action, kind) = (body.action, body.entity_kind);
    let options = body.into_options(auth.context());
    let entry = state.audit.record(action, kind, options).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}
