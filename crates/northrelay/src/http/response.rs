//! HTTP response as seen by the client

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Request ID assigned by the platform, if present.
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` accept
    /// `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseValidation`] if the body does not match `T`.
    pub fn parse_result<T: DeserializeOwned>(&self) -> Result<T> {
        let bytes: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };

        serde_json::from_slice(bytes).map_err(|e| {
            Error::ResponseValidation(format!(
                "{} (status {}, {} bytes)",
                e,
                self.status.as_u16(),
                self.body.len()
            ))
        })
    }
}
