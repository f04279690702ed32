//! Kubernetes error types
//!
//! Remote API failures are kept as a tagged [`RemoteError`] so callers can
//! branch on not-found / conflict / forbidden without inspecting strings.
//! Resource modules wrap every failure in an [`OperationError`] naming the
//! local operation that was running.

use thiserror::Error;

/// Structured failure reported by the Kubernetes API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    NotFound { message: String },
    Conflict { reason: String, message: String },
    Forbidden { message: String },
    Other { code: u16, reason: String, message: String },
}

impl RemoteError {
    /// Classify a `Status` response from the API server
    pub fn from_status(code: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        let reason = reason.into();
        let message = message.into();
        match code {
            404 => RemoteError::NotFound { message },
            409 => RemoteError::Conflict { reason, message },
            403 => RemoteError::Forbidden { message },
            _ => RemoteError::Other {
                code,
                reason,
                message,
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        RemoteError::NotFound {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        RemoteError::Conflict {
            reason: "AlreadyExists".to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RemoteError::Conflict {
            reason: "Conflict".to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            RemoteError::NotFound { .. } => 404,
            RemoteError::Conflict { .. } => 409,
            RemoteError::Forbidden { .. } => 403,
            RemoteError::Other { code, .. } => *code,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            RemoteError::NotFound { .. } => "NotFound",
            RemoteError::Conflict { reason, .. } => reason,
            RemoteError::Forbidden { .. } => "Forbidden",
            RemoteError::Other { reason, .. } => reason,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RemoteError::NotFound { message }
            | RemoteError::Conflict { message, .. }
            | RemoteError::Forbidden { message }
            | RemoteError::Other { message, .. } => message,
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Code: {}, Reason: {})",
            self.message(),
            self.code(),
            self.reason()
        )
    }
}

impl std::error::Error for RemoteError {}

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// The API server answered with an error status
    #[error("{0}")]
    Remote(RemoteError),

    /// The request never produced an API status (connection, TLS, timeout)
    #[error("Kubernetes API unreachable: {0}")]
    Transport(String),

    /// Invalid kubeconfig or connection settings
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Object could not be converted to or from its typed form
    #[error("Malformed object: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl K8sError {
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            K8sError::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

impl From<RemoteError> for K8sError {
    fn from(err: RemoteError) -> Self {
        K8sError::Remote(err)
    }
}

impl From<kube::Error> for K8sError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => K8sError::Remote(RemoteError::from_status(
                response.code,
                response.reason,
                response.message,
            )),
            kube::Error::SerdeError(e) => K8sError::Serialization(e),
            other => K8sError::Transport(other.to_string()),
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;

/// A failed resource operation, tagged with the operation that ran
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct OperationError {
    pub operation: String,
    #[source]
    pub source: K8sError,
}

impl OperationError {
    pub fn remote(&self) -> Option<&RemoteError> {
        self.source.remote()
    }
}

/// Result type alias for resource module operations
pub type OpResult<T> = std::result::Result<T, OperationError>;

/// Attach an operation name to a Kubernetes result and log the failure
pub trait ResultExt<T> {
    fn during(self, operation: &str) -> OpResult<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<K8sError>,
{
    fn during(self, operation: &str) -> OpResult<T> {
        self.map_err(|err| {
            let source = err.into();
            match source.remote() {
                Some(remote) => tracing::error!(
                    operation,
                    code = remote.code(),
                    reason = remote.reason(),
                    details = remote.message(),
                    "Kubernetes API error"
                ),
                None => tracing::error!(operation, error = %source, "Kubernetes client error"),
            }
            OperationError {
                operation: operation.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            RemoteError::from_status(404, "NotFound", "x"),
            RemoteError::NotFound { .. }
        ));
        assert!(matches!(
            RemoteError::from_status(409, "AlreadyExists", "x"),
            RemoteError::Conflict { .. }
        ));
        assert!(matches!(
            RemoteError::from_status(403, "Forbidden", "x"),
            RemoteError::Forbidden { .. }
        ));
        assert_eq!(
            RemoteError::from_status(422, "Invalid", "bad spec"),
            RemoteError::Other {
                code: 422,
                reason: "Invalid".to_string(),
                message: "bad spec".to_string()
            }
        );
    }

    #[test]
    fn test_kube_api_error_becomes_remote() {
        let err: K8sError = kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "configmaps \"app\" not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        })
        .into();

        let remote = err.remote().unwrap();
        assert_eq!(remote.code(), 404);
        assert_eq!(remote.reason(), "NotFound");
    }

    #[test]
    fn test_operation_message_format() {
        let result: K8sResult<()> = Err(RemoteError::not_found("secrets \"db\" not found").into());
        let err = result.during("delete secret").unwrap_err();

        assert_eq!(
            err.to_string(),
            "delete secret failed: secrets \"db\" not found (Code: 404, Reason: NotFound)"
        );
        assert_eq!(err.remote().map(RemoteError::code), Some(404));
    }
}
