//! Remote status passthrough
//!
//! When enabled, a failed Kubernetes operation is answered with the status
//! the control plane reported (404, 409 or 403) instead of 500. The body is
//! left untouched.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::error::RemoteStatus;

pub async fn remote_status_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if let Some(RemoteStatus(status)) = response.extensions().get::<RemoteStatus>().copied() {
        tracing::debug!(%status, "Passing through remote status");
        *response.status_mut() = status;
    }

    response
}
