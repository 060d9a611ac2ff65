//! Question endpoints: raw HTTP (`/`, `/ask`) and envelope passthrough (`/invoke`).

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use tracing::error;

use crate::event::{InvocationEvent, InvocationResponse};
use crate::handler::HandlerError;
use crate::state::AppState;

const INTERNAL_ERROR: &str = "Internal server error";

/// Ask a question about a document
///
/// Body is `{query, filename, filecontent}` with `filecontent` base64-encoded.
/// The file is stored, its text is searched for fragments containing the
/// query, and the fragments are turned into an answer by the language model
/// (or returned verbatim if generation is unavailable).
#[utoipa::path(
    post,
    path = "/ask",
    tag = "Ask",
    request_body = crate::event::QaRequest,
    responses(
        (status = 200, description = "Answer lines", body = crate::event::QaResponse),
        (status = 400, description = "Invalid request", body = crate::event::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::event::ErrorBody)
    )
)]
pub async fn ask(State(state): State<Arc<AppState>>, method: Method, body: Bytes) -> Response {
    let event = event_from_http(&method, &body);
    match state.handler.handle(event).await {
        Ok(resp) => into_http(resp),
        Err(e) => into_http(internal_error(&e)),
    }
}

/// Run a full invocation event
///
/// Accepts the API-Gateway proxy event shape and returns the proxy response
/// envelope unchanged.
#[utoipa::path(
    post,
    path = "/invoke",
    tag = "Ask",
    request_body = InvocationEvent,
    responses(
        (status = 200, description = "Handler response envelope", body = InvocationResponse),
        (status = 500, description = "Storage failure", body = InvocationResponse)
    )
)]
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(event): Json<InvocationEvent>,
) -> (StatusCode, Json<InvocationResponse>) {
    match state.handler.handle(event).await {
        Ok(resp) => (StatusCode::OK, Json(resp)),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(internal_error(&e))),
    }
}

fn internal_error(e: &HandlerError) -> InvocationResponse {
    error!("Invocation failed: {}", e);
    InvocationResponse::error(500, INTERNAL_ERROR)
}

/// Build an event from a raw HTTP request. Non-UTF-8 bodies are passed on
/// base64-encoded, as an API gateway would for binary payloads.
pub(crate) fn event_from_http(method: &Method, body: &Bytes) -> InvocationEvent {
    let (body, is_base64_encoded) = if body.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(body) {
            Ok(text) => (Some(text.to_string()), false),
            Err(_) => (Some(STANDARD.encode(body)), true),
        }
    };

    InvocationEvent {
        http_method: Some(method.as_str().to_string()),
        is_base64_encoded: Some(is_base64_encoded),
        body,
    }
}

fn into_http(resp: InvocationResponse) -> Response {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, resp.body).into_response();
    // String bodies default to text/plain; only the envelope decides.
    response.headers_mut().remove(axum::http::header::CONTENT_TYPE);
    for (name, value) in &resp.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}
