//! Local web server endpoint handlers.
//!
//! Everything except `/health` is funnelled into the form handler, which does
//! its own method and path validation.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::gateway::{FormRequest, FormResponse};
use crate::handler::FormHandler;

/// Bodies larger than this are reported as unreadable to the pipeline.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub handler: FormHandler,
}

impl AppState {
    pub fn new(handler: FormHandler) -> Self {
        Self { handler }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: state.handler.config().mail_provider.to_string(),
    })
}

// =============================================================================
// Form Submission
// =============================================================================

/// Catch-all endpoint translating the axum request into a [`FormRequest`].
pub async fn submit(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> impl IntoResponse {
    let mut request = FormRequest::new(method.as_str(), uri.path());

    for (name, value) in headers.iter() {
        match value.to_str() {
            Ok(v) => request.insert_header(name.as_str(), v),
            Err(_) => warn!(header = %name, "non_ascii_header_skipped"),
        }
    }

    match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) if bytes.is_empty() => {}
        Ok(bytes) => request.body = Some(bytes.to_vec()),
        Err(e) => {
            warn!(error = %e, limit = MAX_BODY_BYTES, "request_body_unreadable");
            request.body_error = Some(e.to_string());
        }
    }

    into_http_response(state.handler.handle(&request).await)
}

fn into_http_response(response: FormResponse) -> impl IntoResponse {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        response.body,
    )
}
