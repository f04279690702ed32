//! Envelope for bodiless error responses
//!
//! Layers and the router itself answer some failures (408 from the request
//! timeout, 405 for a known path with the wrong method) with an empty body.
//! Those are rewritten into the standard `{success, error}` envelope.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use glance_common::ApiResponse;

pub async fn envelope_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !is_bare_error(&response) {
        return response;
    }

    tracing::debug!(%status, "Wrapping bodiless error response");
    let message = match status {
        StatusCode::REQUEST_TIMEOUT => "Request timed out".to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    let (mut parts, _) = response.into_parts();
    let enveloped = (status, Json(ApiResponse::<()>::failure(message))).into_response();
    let (enveloped_parts, body) = enveloped.into_parts();

    // Keep headers such as `Allow` set by the router
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.extend(enveloped_parts.headers);
    Response::from_parts(parts, body)
}

fn is_bare_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && !response.headers().contains_key(header::CONTENT_TYPE)
}
