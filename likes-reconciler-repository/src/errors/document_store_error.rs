//! Document store error types.
//!
//! This module defines the error type shared by every `DocumentStore`
//! implementation, so the reconciler can tell a missing document apart from a
//! refused or failed request.

use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentStoreError {
    /// The document or collection does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The credentials used are not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A failure that may succeed on a later attempt (rate limiting, 5xx, network).
    #[error("Transient error: {0}")]
    Transient(String),

    /// The client could not be set up (bad endpoint, TLS, transport).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store answered with a body that could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No API key was available for a store that requires one.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Any other rejection from the store.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DocumentStoreError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a transient error.
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a missing credentials error.
    pub fn missing_credentials(msg: impl Into<String>) -> Self {
        Self::MissingCredentials(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Map an HTTP status code returned by the store to an error.
    ///
    /// # Arguments
    ///
    /// * `status` - The HTTP status code of the failed response
    /// * `msg` - The message reported by the store, if any
    pub fn from_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            404 => Self::NotFound(msg),
            401 | 403 => Self::Forbidden(msg),
            408 | 429 | 500..=599 => Self::Transient(msg),
            _ => Self::Unknown(format!("status {}: {}", status, msg)),
        }
    }

    /// Whether the document was already gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for DocumentStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else if err.is_builder() {
            Self::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Transient(err.to_string())
        }
    }
}
