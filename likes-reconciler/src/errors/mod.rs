//! Error types for a reconciliation pass.

use axum::http::StatusCode;
use likes_reconciler_repository::DocumentStoreError;
use thiserror::Error;

/// Errors that end a reconciliation pass before it completes.
///
/// Per-document delete failures are not represented here: they never abort a
/// pass and are reported in [`ReconcileReport`](crate::reconciler::ReconcileReport).
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Required settings or credentials are missing.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The event payload is missing or malformed.
    #[error("Payload error: {0}")]
    PayloadError(String),

    /// The payload parsed but cannot be acted on safely.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Listing the video's vote documents failed.
    #[error("Query error: {0}")]
    QueryError(#[source] DocumentStoreError),

    /// Anything else that went wrong during the pass.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ReconcileError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a payload error.
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::PayloadError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an unexpected error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// HTTP status reported to the invoker.
    ///
    /// Input problems are the caller's to fix and map to 400; store failures
    /// map to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ConfigurationError(_) | Self::PayloadError(_) | Self::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::QueryError(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DocumentStoreError> for ReconcileError {
    /// Errors raised while connecting to the store, before any query.
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::MissingCredentials(msg) => Self::ConfigurationError(msg),
            DocumentStoreError::Connection(msg) => Self::ConfigurationError(msg),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

/// Errors that stop the service from starting or serving.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Server I/O error.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ReconcileError::config("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReconcileError::payload("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReconcileError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReconcileError::QueryError(DocumentStoreError::transient("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ReconcileError::unexpected("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_connect_errors_are_configuration() {
        let err: ReconcileError = DocumentStoreError::missing_credentials("no key").into();
        assert!(matches!(err, ReconcileError::ConfigurationError(_)));

        let err: ReconcileError = DocumentStoreError::connection("bad url").into();
        assert!(matches!(err, ReconcileError::ConfigurationError(_)));
    }
}
