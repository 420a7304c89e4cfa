//! Error types for the authorization engine.
//!
//! Every failure is classified into an [`ErrorKind`] that maps to a status
//! code via [`ErrorKind::status_code`], so that whichever transport fronts the
//! engine can report errors consistently.

use keymint_storage::KeyStoreError;
use serde::Serialize;
use thiserror::Error;

/// The classes of failure an operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input
    InvalidRequest,
    /// Missing or expired authority, or a missing required capability
    Unauthorized,
    /// The target key does not exist
    NotFound,
    /// The key store failed or timed out
    StorageError,
}

impl ErrorKind {
    /// Get the HTTP status code for this kind of error.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::StorageError => 500,
        }
    }
}

/// The error type returned by every engine operation.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The request could not be interpreted
    #[error("{0}")]
    InvalidRequest(String),

    /// The authority may not perform the operation
    #[error("{0}")]
    Unauthorized(String),

    /// The target key does not exist
    #[error("API key not found")]
    NotFound,

    /// A key store call failed
    #[error("API key database access failed: {0}")]
    Storage(#[from] KeyStoreError),
}

impl AuthorityError {
    /// The class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthorityError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            AuthorityError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthorityError::NotFound => ErrorKind::NotFound,
            AuthorityError::Storage(_) => ErrorKind::StorageError,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        AuthorityError::InvalidRequest(message.into())
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        AuthorityError::Unauthorized(message.into())
    }
}

/// The serializable form of an [`AuthorityError`] handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// The error class
    pub code: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Get the HTTP status code for this response.
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}

impl From<&AuthorityError> for ErrorResponse {
    fn from(error: &AuthorityError) -> Self {
        Self {
            code: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<AuthorityError> for ErrorResponse {
    fn from(error: AuthorityError) -> Self {
        Self::from(&error)
    }
}
