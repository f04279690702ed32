//! Standardized error handling for API responses
//!
//! Every error is rendered through the same `{success, error}` envelope as
//! successful responses. Remote failures surface as 500 by default; the
//! tagged remote status rides along in the response extensions so
//! [`crate::middleware::remote_status`] can optionally pass it through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glance_common::ApiResponse;
use tracing::{debug, warn};

use crate::kubernetes::error::{OperationError, RemoteError};

/// Status the control plane reported for a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStatus(pub StatusCode);

/// API error types with standardized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),

    /// 500, wrapping a failed Kubernetes operation
    Remote(OperationError),

    /// 404, no route matched the request
    NotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Remote(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Remote(err) => err.to_string(),
        }
    }

    /// Status to use when remote passthrough is enabled
    pub fn remote_status(&self) -> Option<RemoteStatus> {
        let ApiError::Remote(err) = self else {
            return None;
        };
        let status = match err.remote()? {
            RemoteError::NotFound { .. } => StatusCode::NOT_FOUND,
            RemoteError::Conflict { .. } => StatusCode::CONFLICT,
            RemoteError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RemoteError::Other { .. } => return None,
        };
        Some(RemoteStatus(status))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<OperationError> for ApiError {
    fn from(err: OperationError) -> Self {
        ApiError::Remote(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        match &self {
            ApiError::BadRequest(_) => warn!(error = %message, "Rejected request"),
            ApiError::NotFound(_) => debug!(error = %message, "No matching route"),
            // Already logged with code and reason where the operation failed
            ApiError::Remote(_) => {}
        }

        let mut response = (status, Json(ApiResponse::<()>::failure(message))).into_response();
        if let Some(remote) = self.remote_status() {
            response.extensions_mut().insert(remote);
        }
        response
    }
}

/// Helper to create a 400 error
pub fn bad_request(msg: impl Into<String>) -> ApiError {
    ApiError::BadRequest(msg.into())
}

/// Helper to create a 404 error
pub fn not_found(msg: impl Into<String>) -> ApiError {
    ApiError::NotFound(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::error::{K8sError, ResultExt};

    fn remote_not_found() -> ApiError {
        let result: Result<(), K8sError> =
            Err(RemoteError::not_found("secrets \"db\" not found").into());
        ApiError::from(result.during("delete secret").unwrap_err())
    }

    #[test]
    fn test_remote_errors_are_server_errors() {
        let err = remote_not_found();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message(),
            "delete secret failed: secrets \"db\" not found (Code: 404, Reason: NotFound)"
        );
        assert_eq!(
            err.remote_status(),
            Some(RemoteStatus(StatusCode::NOT_FOUND))
        );
    }

    #[test]
    fn test_response_carries_remote_status() {
        let response = remote_not_found().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.extensions().get::<RemoteStatus>(),
            Some(&RemoteStatus(StatusCode::NOT_FOUND))
        );
    }

    #[test]
    fn test_helper_functions() {
        let err = bad_request("Invalid replicas value");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.remote_status().is_none());

        let err = not_found("No route for GET /api/v1/nope");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No route for GET /api/v1/nope");
        assert!(err.remote_status().is_none());
    }

    #[test]
    fn test_other_remote_codes_have_no_passthrough() {
        let result: Result<(), K8sError> =
            Err(RemoteError::from_status(422, "Invalid", "bad spec").into());
        let err = ApiError::from(result.during("create service").unwrap_err());
        assert!(err.remote_status().is_none());
    }
}
