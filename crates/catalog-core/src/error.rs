//! Error types for the catalog.
//!
//! This module provides a unified error type with explicit variants for
//! input validation, backing store and internal failures. Precondition
//! failures on conditional writes are not errors: they surface as
//! [`Conditional::ConditionFailed`](crate::traits::Conditional) and are
//! translated into typed outcomes by the service layer.

use thiserror::Error;

/// Longest diagnostic string exposed to callers.
const MAX_DIAGNOSTIC_LEN: usize = 200;

/// The unified error type for catalog operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, rejected before any store call.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Backing store or network failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Anything unexpected.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create an internal error from any message.
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Short diagnostic string safe to hand back to a caller.
    pub fn diagnostic(&self) -> String {
        let text = match self {
            Error::InvalidInput(e) => e.to_string(),
            Error::Store(e) => e.summary(),
            Error::Internal { message } => message.clone(),
        };

        if text.chars().count() > MAX_DIAGNOSTIC_LEN {
            text.chars().take(MAX_DIAGNOSTIC_LEN).collect()
        } else {
            text
        }
    }
}

/// Backing store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Local filesystem failure.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Stored data could not be encoded or decoded.
    #[error("encoding error: {message}")]
    Encoding { message: String },

    /// The remote store rejected the request.
    #[error("service error: {message}")]
    Service { message: String },

    /// Connection to the remote store failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The store answered with something we cannot interpret.
    #[error("unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

impl StoreError {
    fn summary(&self) -> String {
        match self {
            StoreError::Io { .. } => "store IO failure".to_string(),
            StoreError::Encoding { .. } => "store data could not be decoded".to_string(),
            StoreError::Service { .. } => "store service error".to_string(),
            StoreError::Connection { .. } => "store connection error".to_string(),
            StoreError::Timeout => "store request timed out".to_string(),
            StoreError::UnexpectedResponse { message } => message.clone(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Store(StoreError::from(err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Encoding {
            message: err.to_string(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid record identifier.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid counter period.
    #[error("invalid period '{value}': {reason}")]
    PeriodKey { value: String, reason: String },

    /// Invalid store URL.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// A store expression cannot be applied.
    #[error("invalid expression: {reason}")]
    Expression { reason: String },

    /// A request field failed validation.
    #[error("{field}: {reason}")]
    Field { field: String, reason: String },

    /// Disallowed content type.
    #[error("invalid content type '{value}'. Allowed: {allowed}")]
    ContentType { value: String, allowed: String },

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

impl InvalidInputError {
    /// Shorthand for a field validation failure.
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        InvalidInputError::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_diagnostic_hides_backend_text() {
        let err = Error::Store(StoreError::Service {
            message: "ProvisionedThroughputExceededException: arn:aws:dynamodb:...".to_string(),
        });
        assert_eq!(err.diagnostic(), "store service error");
    }

    #[test]
    fn diagnostic_is_truncated() {
        let err = Error::internal("x".repeat(500));
        assert_eq!(err.diagnostic().len(), MAX_DIAGNOSTIC_LEN);
    }

    #[test]
    fn field_error_display() {
        let err = InvalidInputError::field("sizeBytes", "must be a valid number");
        assert_eq!(err.to_string(), "sizeBytes: must be a valid number");
    }
}
