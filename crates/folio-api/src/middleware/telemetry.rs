//! Request telemetry middleware: records every non-excluded request with
//! its outcome and timing.

use std::collections::HashMap;
use std::time::Instant;

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{Query, Request, State};
use axum::http::header::{CONTENT_LENGTH, USER_AGENT};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use folio_core::types::JsonMap;
use folio_service::{RequestInfo, RequestOptions, ResponseInfo};

use crate::error::ApiErrorResponse;
use crate::extractors::auth::actor_from_headers;
use crate::extractors::client_ip;
use crate::state::AppState;

/// Exception kind stored when the response body could not be read.
const BODY_ERROR_KIND: &str = "BODY_ERROR";

/// Times the request, measures the response body and appends one
/// telemetry record. The write runs on a detached task, so a slow or
/// failing request log never delays or alters the response.
pub async fn record_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !state.telemetry.should_record(&path) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let info = request_info(&request, path);
    let actor = actor_from_headers(request.headers()).ok().flatten();

    let response = next.run(request).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let (mut parts, body) = response.into_parts();
    let (bytes, buffer_error) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => (bytes, None),
        Err(e) => {
            warn!(path = %info.path, error = %e, "Failed to buffer response body");
            parts.headers.remove(CONTENT_LENGTH);
            (Bytes::new(), Some(e.to_string()))
        }
    };

    let status = parts.status.as_u16();
    info!(
        method = %info.method,
        path = %info.path,
        status,
        duration_ms = elapsed_ms,
        "HTTP request"
    );

    let mut options = RequestOptions {
        actor,
        ..RequestOptions::default()
    };
    if let Some(message) = buffer_error {
        options.error_message = Some(message);
        options.exception_kind = Some(BODY_ERROR_KIND.to_string());
    } else if status >= 400 {
        if let Ok(body) = serde_json::from_slice::<ApiErrorResponse>(&bytes) {
            options.error_message = Some(body.message);
            options.exception_kind = Some(body.error);
        }
    }

    let response_info = ResponseInfo {
        status_code: status,
        response_size: bytes.len() as u64,
    };
    let telemetry = state.telemetry.clone();
    tokio::spawn(async move {
        telemetry
            .record_or_warn(info, response_info, elapsed_ms, options)
            .await;
    });

    Response::from_parts(parts, Body::from(bytes))
}

fn request_info(request: &Request, path: String) -> RequestInfo {
    let query_params: JsonMap = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .map(|Query(params)| {
            params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        })
        .unwrap_or_default();

    RequestInfo {
        method: request.method().as_str().to_string(),
        path,
        query_params,
        user_agent: request
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        ip_address: client_ip(request.headers(), request.extensions()),
        requested_at: Utc::now(),
    }
}
