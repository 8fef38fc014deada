//! `AuthUser` extractor: reads the caller identity forwarded by the
//! upstream identity gateway and builds the request context.
//!
//! Token issuance and verification live in front of this service; the
//! gateway strips any client-supplied identity headers and sets these.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use uuid::Uuid;

use folio_core::error::AppError;
use folio_entity::user::{Actor, UserRole};
use folio_service::context::RequestContext;

use super::client::client_ip;
use crate::error::ApiError;

/// Account id of the caller.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Display identity (usually the email) of the caller.
pub const ACTOR_LABEL_HEADER: &str = "x-actor-label";
/// Role of the caller.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
/// Opaque session key of the caller.
pub const SESSION_KEY_HEADER: &str = "x-session-key";

/// Extracted authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The identity carried by the request headers, if any.
///
/// Absent headers mean an anonymous caller; present but malformed headers
/// are an authentication error.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Option<Actor>, AppError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let Some(raw_id) = header(ACTOR_ID_HEADER) else {
        return Ok(None);
    };
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::authentication("Malformed actor id header"))?;
    let role = match header(ACTOR_ROLE_HEADER) {
        Some(raw) => raw
            .parse::<UserRole>()
            .map_err(|_| AppError::authentication(format!("Unknown role: {raw}")))?,
        None => UserRole::Viewer,
    };
    let label = header(ACTOR_LABEL_HEADER)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string());

    Ok(Some(Actor::new(id, label, role)))
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = actor_from_headers(&parts.headers)?
            .ok_or_else(|| AppError::authentication("Authentication required"))?;

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let session_key = parts
            .headers
            .get(SESSION_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let mut ctx = RequestContext::for_actor(actor)
            .with_ip(client_ip(&parts.headers, &parts.extensions))
            .with_user_agent(user_agent);
        ctx.session_key = session_key;

        Ok(AuthUser(ctx))
    }
}
