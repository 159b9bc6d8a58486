//! Transport-level failures
//!
//! The networking stack reports failures as opaque error chains. This module
//! reduces them to a small set of semantic categories so that the retry
//! decision does not depend on the wording of any particular library.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use http::HeaderMap;

/// Why a request produced no HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailure {
    /// The attempt exceeded the per-request timeout.
    Timeout,
    /// The remote host actively refused the connection.
    ConnectionRefused,
    /// The connection was reset or closed mid-exchange.
    ConnectionReset,
    /// The host name could not be resolved.
    Dns,
    /// The connection could not be established for another reason, such as
    /// a TLS handshake or certificate failure.
    Connect,
    /// Anything else, such as a malformed request or a TLS policy violation.
    Other,
}

impl TransportFailure {
    /// Whether the failure is transient.
    ///
    /// Timeouts, refused or reset connections and resolver failures are
    /// retried. [`TransportFailure::Connect`] and [`TransportFailure::Other`]
    /// are terminal.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            TransportFailure::Timeout
                | TransportFailure::ConnectionRefused
                | TransportFailure::ConnectionReset
                | TransportFailure::Dns
        )
    }

    /// Short lowercase label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportFailure::Timeout => "timeout",
            TransportFailure::ConnectionRefused => "connection_refused",
            TransportFailure::ConnectionReset => "connection_reset",
            TransportFailure::Dns => "dns",
            TransportFailure::Connect => "connect",
            TransportFailure::Other => "other",
        }
    }

    /// Categorize an error chain.
    ///
    /// `timed_out` and `connect_phase` are hints from the top-level error
    /// (reqwest exposes both). The chain is walked looking for resolver
    /// failures, then for `std::io::Error` kinds.
    pub fn from_error_chain(
        error: &(dyn StdError + 'static),
        timed_out: bool,
        connect_phase: bool,
    ) -> Self {
        if timed_out {
            return TransportFailure::Timeout;
        }

        let mut current = Some(error);
        while let Some(cause) = current {
            if let Some(io_err) = cause.downcast_ref::<io::Error>() {
                match io_err.kind() {
                    io::ErrorKind::ConnectionRefused => return TransportFailure::ConnectionRefused,
                    io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof => return TransportFailure::ConnectionReset,
                    io::ErrorKind::TimedOut => return TransportFailure::Timeout,
                    _ => {}
                }
            }

            let text = cause.to_string().to_ascii_lowercase();
            if text.contains("dns error")
                || text.contains("failed to lookup address")
                || text.contains("name or service not known")
                || text.contains("no such host")
            {
                return TransportFailure::Dns;
            }
            if text.contains("connection reset")
                || text.contains("connection closed before message completed")
            {
                return TransportFailure::ConnectionReset;
            }

            current = cause.source();
        }

        if connect_phase {
            TransportFailure::Connect
        } else {
            TransportFailure::Other
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{failure} failure: {message}")]
pub struct TransportError {
    failure: TransportFailure,
    message: String,
    response_headers: Option<HeaderMap>,
}

impl TransportError {
    /// Create a transport error from its category and a description.
    pub fn new(failure: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            failure,
            message: message.into(),
            response_headers: None,
        }
    }

    /// Attach the headers of a response whose body could not be read.
    pub fn with_response_headers(mut self, headers: HeaderMap) -> Self {
        self.response_headers = Some(headers);
        self
    }

    /// The failure category.
    pub fn failure(&self) -> TransportFailure {
        self.failure
    }

    /// The underlying cause, flattened to a string.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Headers received before the failure, if the status line arrived.
    pub fn response_headers(&self) -> Option<&HeaderMap> {
        self.response_headers.as_ref()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let failure = TransportFailure::from_error_chain(&err, err.is_timeout(), err.is_connect());
        Self::new(failure, chain_message(&err))
    }
}

fn chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}
