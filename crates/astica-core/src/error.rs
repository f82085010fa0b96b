//! Error types for astica operations.
//!
//! Every failure of a client call is surfaced to the caller through [`Error`].
//! Nothing is retried or recovered locally.

use thiserror::Error;

/// Main error type for astica operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Request body could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Response body was not valid JSON for the expected schema
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The service answered with anything other than `200 OK`
    #[error("Invalid status code: {status} {reason}")]
    UnexpectedStatus {
        /// Numeric HTTP status code
        status: u16,
        /// Canonical reason phrase for the status, empty if unknown
        reason: String,
    },

    /// Connection to the service could not be established
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for astica operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::UnexpectedStatus`] from an HTTP status code.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::UnexpectedStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "ENCODE_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Returns true if the failure happened before any HTTP status was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable(_) | Self::Timeout(_) | Self::HttpError(_)
        )
    }

    /// Returns the HTTP status code for [`Error::UnexpectedStatus`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
