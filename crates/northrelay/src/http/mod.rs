//! HTTP transport for the SDK
//!
//! A single attempt goes through an [`HttpProvider`]: it takes an
//! [`ApiRequest`] and returns either a [`Response`] (any status) or a
//! [`TransportError`] when no response was received. Retrying and error
//! classification happen above this layer, in the client.

pub use northrelay_provider::{NorthRelayHttpProvider, NorthRelayHttpProviderBuilder};
pub use provider::HttpProvider;
pub use request::ApiRequest;
pub use response::Response;
pub use transport::{TransportError, TransportFailure};

mod northrelay_provider;
pub mod provider;
mod request;
mod response;
mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
