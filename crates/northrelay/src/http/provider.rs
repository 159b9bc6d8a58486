//! HTTP provider trait for abstracting the transport
//!
//! The client only ever talks to an [`HttpProvider`]. The production
//! implementation is [`NorthRelayHttpProvider`](super::NorthRelayHttpProvider);
//! tests and embedders can supply their own, for instance to route requests
//! through a proxy layer or to script failures.

use async_trait::async_trait;
use std::fmt;

use super::{ApiRequest, Response, TransportError};

/// Sends a single HTTP attempt.
///
/// Implementations must not retry or interpret status codes: any HTTP
/// response, including 4xx and 5xx, is returned as `Ok`. `Err` is reserved for
/// attempts that produced no response at all.
#[async_trait]
pub trait HttpProvider: Send + Sync + fmt::Debug {
    /// Send `request` once.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no HTTP response was received
    /// (timeout, DNS failure, refused or reset connection).
    async fn send(&self, request: &ApiRequest) -> Result<Response, TransportError>;

    /// Get the provider name for debugging/logging.
    fn provider_name(&self) -> &'static str;

    /// Get the base URL for this provider (for debugging).
    fn base_url(&self) -> &str;
}
