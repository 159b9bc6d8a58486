//! Webhook signature verification
//!
//! The platform signs every webhook delivery with HMAC-SHA256 over the raw
//! request body, keyed with the endpoint's secret, and sends the hex digest in
//! the [`SIGNATURE_HEADER`] header. Verify against the exact bytes received,
//! before any JSON re-encoding.
//!
//! # Example
//!
//! ```rust
//! use northrelay::webhook::{WebhookVerifier, EventType};
//!
//! # fn handle(body: &[u8], signature: &str) -> Result<(), northrelay::webhook::WebhookError> {
//! let verifier = WebhookVerifier::new("whsec_...");
//! let event = verifier.parse(body, signature)?;
//! if event.event_type == EventType::Bounced {
//!     // suppress the recipient
//! }
//! # Ok(())
//! # }
//! ```

mod event;
mod signature;

use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use event::{EventType, WebhookEvent};
pub use signature::{SIGNATURE_HEX_LEN, SIGNATURE_PREFIX, compute_signature, verify_signature};

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-NorthRelay-Signature";

/// Webhook verification errors.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature is missing, malformed, or does not match the payload.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// The signature matched but the payload is not a webhook event.
    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),

    /// An event could not be encoded.
    #[error("Failed to serialize webhook event: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The secret is empty.
    #[error("Webhook secret cannot be empty")]
    InvalidSecret,
}

/// A payload together with its signature, as the platform would deliver it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Raw JSON body
    pub payload: Vec<u8>,
    /// Hex-encoded HMAC-SHA256 of `payload`
    pub signature: String,
}

/// Verify `payload` and decode it into a [`WebhookEvent`].
///
/// Nothing is decoded unless the signature checks out.
///
/// # Errors
///
/// - [`WebhookError::InvalidSignature`] if any input is empty or the
///   signature does not match
/// - [`WebhookError::MalformedPayload`] if the verified body is not an event
pub fn parse_event(
    payload: &[u8],
    signature: &str,
    secret: &str,
) -> Result<WebhookEvent, WebhookError> {
    if !verify_signature(payload, signature, secret) {
        return Err(WebhookError::InvalidSignature);
    }

    serde_json::from_slice(payload).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
}

/// Encode `event` and sign it, for tests and local tooling.
///
/// The output always satisfies [`parse_event`] under the same secret.
///
/// # Errors
///
/// Returns [`WebhookError::InvalidSecret`] for an empty secret.
pub fn construct_payload(event: &WebhookEvent, secret: &str) -> Result<SignedPayload, WebhookError> {
    let payload = serde_json::to_vec(event)?;
    let signature = compute_signature(&payload, secret)?;
    Ok(SignedPayload { payload, signature })
}

/// Verifies deliveries for one webhook endpoint.
///
/// Holds the endpoint secret so handlers do not pass it around as a plain
/// string.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier for `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into().into_boxed_str()),
        }
    }

    /// Create a verifier from an existing secret.
    pub fn from_secret(secret: SecretString) -> Self {
        Self { secret }
    }

    /// See [`verify_signature`].
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        verify_signature(payload, signature, self.secret.expose_secret())
    }

    /// See [`parse_event`].
    pub fn parse(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, WebhookError> {
        parse_event(payload, signature, self.secret.expose_secret())
    }

    /// Verify using the signature from the request headers.
    ///
    /// A missing or non-ASCII header fails verification.
    pub fn verify_headers(&self, payload: &[u8], headers: &HeaderMap) -> bool {
        signature_from(headers).is_some_and(|signature| self.verify(payload, signature))
    }

    /// Parse using the signature from the request headers.
    ///
    /// # Errors
    ///
    /// Same as [`parse_event`]; a missing header is
    /// [`WebhookError::InvalidSignature`].
    pub fn parse_with_headers(
        &self,
        payload: &[u8],
        headers: &HeaderMap,
    ) -> Result<WebhookEvent, WebhookError> {
        let signature = signature_from(headers).ok_or(WebhookError::InvalidSignature)?;
        self.parse(payload, signature)
    }

    /// See [`construct_payload`].
    pub fn sign(&self, event: &WebhookEvent) -> Result<SignedPayload, WebhookError> {
        construct_payload(event, self.secret.expose_secret())
    }
}

fn signature_from(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
}
