//! Settings singleton handlers. Updates replace the whole record and are
//! recorded in the audit trail with a field-level diff.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use folio_entity::audit::changes::diff_json;
use folio_entity::audit::{AuditAction, AuditChanges, EntityKind};
use folio_entity::settings::{
    AboutContent, ContactSetting, Singleton, SingletonEntity, SystemSetting,
};
use folio_service::AuditOptions;

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

type SettingsResponse<T> = Result<Json<ApiResponse<Singleton<T>>>, ApiError>;

/// GET /api/admin/settings/system
pub async fn get_system(
    State(state): State<AppState>,
    auth: AuthUser,
) -> SettingsResponse<SystemSetting> {
    require_admin(&auth)?;
    Ok(Json(ApiResponse::ok(state.settings.system().get().await?)))
}

/// PUT /api/admin/settings/system
pub async fn update_system(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(value): ApiJson<SystemSetting>,
) -> SettingsResponse<SystemSetting> {
    require_admin(&auth)?;
    let before = state.settings.system().get().await?;
    let after = state.settings.replace_system(value).await?;
    audit_update(&state, &auth, "Update system settings", &before, &after).await;
    Ok(Json(ApiResponse::ok(after)))
}

/// GET /api/admin/settings/contact
pub async fn get_contact(
    State(state): State<AppState>,
    auth: AuthUser,
) -> SettingsResponse<ContactSetting> {
    require_admin(&auth)?;
    Ok(Json(ApiResponse::ok(state.settings.contact().get().await?)))
}

/// PUT /api/admin/settings/contact
pub async fn update_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(value): ApiJson<ContactSetting>,
) -> SettingsResponse<ContactSetting> {
    require_admin(&auth)?;
    let before = state.settings.contact().get().await?;
    let after = state.settings.contact().replace(value).await?;
    audit_update(&state, &auth, "Update contact settings", &before, &after).await;
    Ok(Json(ApiResponse::ok(after)))
}

/// GET /api/admin/settings/about
pub async fn get_about(
    State(state): State<AppState>,
    auth: AuthUser,
) -> SettingsResponse<AboutContent> {
    require_admin(&auth)?;
    Ok(Json(ApiResponse::ok(state.settings.about().get().await?)))
}

/// PUT /api/admin/settings/about
pub async fn update_about(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(value): ApiJson<AboutContent>,
) -> SettingsResponse<AboutContent> {
    require_admin(&auth)?;
    let before = state.settings.about().get().await?;
    let after = state.settings.about().replace(value).await?;
    audit_update(&state, &auth, "Update about content", &before, &after).await;
    Ok(Json(ApiResponse::ok(after)))
}

async fn audit_update<T: SingletonEntity>(
    state: &AppState,
    auth: &AuthUser,
    description: &str,
    before: &Singleton<T>,
    after: &Singleton<T>,
) {
    let changes = match (
        serde_json::to_value(&before.value),
        serde_json::to_value(&after.value),
    ) {
        (Ok(old), Ok(new)) => diff_json(&old, &new),
        (Err(e), _) | (_, Err(e)) => {
            warn!(kind = T::KIND, error = %e, "Failed to diff settings for audit");
            AuditChanges::new()
        }
    };

    let options = AuditOptions::from_context(auth.context())
        .entity_id(after.id.to_string())
        .description(description)
        .changes(changes);
    state
        .audit
        .record_or_warn(AuditAction::Update, EntityKind::System, options)
        .await;
}
