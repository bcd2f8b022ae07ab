//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// The longest prefix of `text` that fits in `limit` bytes without splitting
/// a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let end = (0..=limit)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}
