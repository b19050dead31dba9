//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body) = read_body(body).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    log_body("Received request", &format!("{parts:#?}"), &body);

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let Some(body) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_body("Sending response", &format!("{parts:#?}"), &body);

    Response::from_parts(parts, Body::from(body))
}

async fn read_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body: {error}"))
        .ok()
}

fn log_body(message: &str, head: &str, body: &Bytes) {
    let body = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{message}: {head}\nbody: {}...", truncate(&body));
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}: {head}\nbody: {body:?}");
    }
}

/// The longest prefix of `text` that fits in [LOG_BODY_LENGTH_LIMIT] bytes
/// without splitting a character.
fn truncate(text: &str) -> &str {
    let end = (0..=LOG_BODY_LENGTH_LIMIT.min(text.len()))
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    &text[..end]
}
