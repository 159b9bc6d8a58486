//! Error types for the NorthRelay SDK
//!
//! Failures fall into two groups:
//!
//! - [`ApiError`]: the platform (or the network between us) refused a request.
//!   Its [`ErrorKind`] is a closed taxonomy that callers match on to decide
//!   what to do next, such as sleeping on [`ErrorKind::RateLimited`] or asking
//!   for a new key on [`ErrorKind::Authentication`].
//! - Everything else on [`Error`]: local problems such as a malformed API key,
//!   an invalid base URL, or a cancelled call.
//!
//! The mapping from HTTP outcomes to [`ErrorKind`] lives in [`classify`].

pub mod classify;

use std::time::Duration;

use northrelay_core::{PolicyError, Retryable};
use thiserror::Error;

use crate::http::TransportFailure;
use crate::webhook::WebhookError;

pub use classify::{DEFAULT_RETRY_AFTER, TransportOutcome, classify};

/// Result type alias for operations that can fail with a NorthRelay SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the NorthRelay SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// The API rejected the request, or it never reached the API.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The caller cancelled the operation before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The API key does not have a recognized format.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Retry settings are inconsistent.
    #[error("Invalid retry policy: {0}")]
    InvalidRetryPolicy(#[from] PolicyError),

    /// A call was made with arguments that cannot form a valid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A successful response did not have the expected shape.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Webhook verification or parsing failed.
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl Error {
    /// The API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// The classified kind, if this error came from the API or the network.
    pub fn kind(&self) -> Option<&ErrorKind> {
        self.as_api().map(|err| &err.kind)
    }

    /// HTTP status of the response that produced this error.
    pub fn status(&self) -> Option<u16> {
        self.as_api().and_then(|err| err.status)
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_some_and(ErrorKind::is_retryable)
    }

    /// Get retry delay if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        self.kind().and_then(ErrorKind::retry_after)
    }
}

impl From<northrelay_core::Cancelled> for Error {
    fn from(_: northrelay_core::Cancelled) -> Self {
        Error::Cancelled
    }
}

impl Retryable for Error {
    fn is_retryable(&self) -> bool {
        Error::is_retryable(self)
    }

    fn status_code(&self) -> Option<u16> {
        self.status()
    }

    fn retry_after(&self) -> Option<Duration> {
        Error::retry_after(self)
    }
}

/// The closed set of failure kinds a request can end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API key is missing, invalid, revoked, or lacks the required scope.
    Authentication,

    /// The request was malformed.
    Validation {
        /// Per-field problems reported by the API (may be empty)
        fields: Vec<FieldError>,
    },

    /// The account has used up its plan allowance.
    QuotaExceeded {
        /// Units consumed in the current period
        used: Option<u64>,
        /// Allowance for the current period
        limit: Option<u64>,
        /// Units left in the current period
        remaining: Option<u64>,
    },

    /// Too many requests; wait before trying again.
    RateLimited {
        /// Delay requested by the server
        retry_after: Duration,
    },

    /// The addressed resource does not exist.
    NotFound,

    /// The platform failed internally.
    ServerError,

    /// No HTTP response was received.
    Network {
        /// What went wrong at the transport level
        failure: TransportFailure,
    },

    /// A code or status this client does not recognize.
    Unknown {
        /// The machine-readable code from the response, if there was one
        raw_code: Option<String>,
    },
}

impl ErrorKind {
    /// Stable machine-readable identifier for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Validation { .. } => "validation_error",
            ErrorKind::QuotaExceeded { .. } => "quota_exceeded",
            ErrorKind::RateLimited { .. } => "rate_limited",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Network { .. } => "network_error",
            ErrorKind::Unknown { .. } => "unknown_error",
        }
    }

    /// Whether repeating the identical request could succeed.
    ///
    /// Server errors, rate limiting, and transport failures with an
    /// identifiable transient cause are retryable. Everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::ServerError | ErrorKind::RateLimited { .. } => true,
            ErrorKind::Network { failure } => failure.is_retryable(),
            ErrorKind::Authentication
            | ErrorKind::Validation { .. }
            | ErrorKind::QuotaExceeded { .. }
            | ErrorKind::NotFound
            | ErrorKind::Unknown { .. } => false,
        }
    }

    /// Server-requested delay, for [`ErrorKind::RateLimited`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ErrorKind::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    pub(crate) fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "Invalid API key",
            ErrorKind::Validation { .. } => "Request validation failed",
            ErrorKind::QuotaExceeded { .. } => "Email quota exceeded",
            ErrorKind::RateLimited { .. } => "Rate limit exceeded",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::ServerError => "Server error",
            ErrorKind::Network { .. } => "Network error",
            ErrorKind::Unknown { .. } => "Unexpected API error",
        }
    }

    pub(crate) fn default_hint(&self) -> Option<&'static str> {
        match self {
            ErrorKind::Authentication => {
                Some("Check that the API key is active and carries the scopes this call needs")
            }
            ErrorKind::Validation { .. } => Some("Fix the listed fields and resend"),
            ErrorKind::QuotaExceeded { .. } => {
                Some("Upgrade the plan or wait for the next billing period")
            }
            ErrorKind::RateLimited { .. } => Some("Wait for the retry-after delay before resending"),
            _ => None,
        }
    }
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,
    /// Validation error message
    pub message: String,
    /// Error code if provided
    pub code: Option<String>,
}

/// A classified API failure with its advisory metadata.
///
/// Only [`kind`](ApiError::kind) drives control flow. The remaining fields
/// are for humans and logs.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} ({})", .kind.code())]
pub struct ApiError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Suggested remediation
    pub hint: Option<String>,
    /// Link to relevant documentation
    pub docs_url: Option<String>,
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// Request ID for support tickets
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create an error of `kind` with no metadata besides the message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
            docs_url: None,
            status: None,
            request_id: None,
        }
    }

    /// Stable machine-readable identifier, see [`ErrorKind::code`].
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Server-requested delay, for rate-limit errors.
    pub fn retry_after(&self) -> Option<Duration> {
        self.kind.retry_after()
    }

    /// Attach the HTTP status that produced this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(kind: ErrorKind) -> Error {
        Error::Api(ApiError::new(kind, "test"))
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(api(ErrorKind::ServerError).is_retryable());
        assert!(
            api(ErrorKind::RateLimited {
                retry_after: Duration::from_secs(1)
            })
            .is_retryable()
        );
        assert!(
            api(ErrorKind::Network {
                failure: TransportFailure::ConnectionRefused
            })
            .is_retryable()
        );

        assert!(!api(ErrorKind::Authentication).is_retryable());
        assert!(!api(ErrorKind::NotFound).is_retryable());
        assert!(!api(ErrorKind::Validation { fields: vec![] }).is_retryable());
        assert!(
            !api(ErrorKind::QuotaExceeded {
                used: Some(10),
                limit: Some(10),
                remaining: Some(0)
            })
            .is_retryable()
        );
        assert!(!api(ErrorKind::Unknown { raw_code: None }).is_retryable());
        assert!(
            !api(ErrorKind::Network {
                failure: TransportFailure::Other
            })
            .is_retryable()
        );

        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::InvalidApiKey("x".into()).is_retryable());
    }

    #[test]
    fn test_error_retry_after() {
        let error = api(ErrorKind::RateLimited {
            retry_after: Duration::from_secs(60),
        });
        assert_eq!(error.retry_after(), Some(Duration::from_secs(60)));

        assert_eq!(api(ErrorKind::ServerError).retry_after(), None);
        assert_eq!(Error::Cancelled.retry_after(), None);
    }

    #[test]
    fn test_retryable_trait_exposes_status() {
        let error = Error::Api(ApiError::new(ErrorKind::ServerError, "boom").with_status(503));
        assert_eq!(Retryable::status_code(&error), Some(503));
        assert_eq!(Retryable::status_code(&Error::Cancelled), None);
    }

    #[test]
    fn test_cancelled_conversion() {
        let error = Error::from(northrelay_core::Cancelled);
        assert!(matches!(error, Error::Cancelled));
        assert_eq!(error.to_string(), "Request cancelled");
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let error = ApiError::new(ErrorKind::NotFound, "Template not found");
        assert_eq!(error.to_string(), "Template not found (not_found)");
        assert_eq!(Error::from(error).to_string(), "Template not found (not_found)");
    }

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            ErrorKind::Authentication,
            ErrorKind::Validation { fields: vec![] },
            ErrorKind::QuotaExceeded {
                used: None,
                limit: None,
                remaining: None,
            },
            ErrorKind::RateLimited {
                retry_after: Duration::ZERO,
            },
            ErrorKind::NotFound,
            ErrorKind::ServerError,
            ErrorKind::Network {
                failure: TransportFailure::Timeout,
            },
            ErrorKind::Unknown { raw_code: None },
        ];

        let codes: std::collections::HashSet<_> = kinds.iter().map(ErrorKind::code).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_kind_accessor() {
        let error = api(ErrorKind::NotFound);
        assert_eq!(error.kind(), Some(&ErrorKind::NotFound));
        assert!(Error::MissingConfig("api key".into()).kind().is_none());
    }
}
