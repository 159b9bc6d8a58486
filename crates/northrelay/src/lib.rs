//! # NorthRelay SDK
//!
//! Rust SDK for the NorthRelay email delivery API:
//! - Transactional and template email, scheduling, batches
//! - Templates, sending domains, contacts, campaigns
//! - Delivery event history and webhook endpoints
//! - Analytics reports, delivery metrics, API keys, brand themes
//! - Webhook signature verification
//! - Automatic retries with exponential backoff and rate-limit tracking
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use northrelay::Client;
//! use northrelay::types::{EmailAddress, EmailContent, SendEmailRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("nr_live_...")?;
//!
//!     let request = SendEmailRequest::builder()
//!         .from("noreply@example.com")
//!         .to(vec![EmailAddress::new("user@example.com")])
//!         .content(EmailContent::html("Hello", "<p>Hello from NorthRelay</p>"))
//!         .build()?;
//!
//!     let sent = client.emails().send(&request).await?;
//!     println!("queued {}", sent.message_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Verifying webhooks
//!
//! ```rust
//! use northrelay::webhook::WebhookVerifier;
//!
//! let verifier = WebhookVerifier::new("whsec_...");
//! let body = br#"{"id":"evt_1"}"#;
//! assert!(!verifier.verify(body, "sha256=00"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ApiKeyMode, ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, Error, ErrorKind, FieldError, Result};
pub use northrelay_core::{CancellationToken, PolicyError, RetryPolicy};
pub use rate_limit::RateLimitSnapshot;
pub use webhook::{EventType, WebhookError, WebhookEvent, WebhookVerifier};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod rate_limit;
pub mod resources;
pub mod types;
pub mod webhook;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use northrelay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiError, Client, ClientConfig, Error, ErrorKind, Result, RetryPolicy,
        types::{EmailAddress, EmailContent, PageParams, SendEmailRequest, SendEmailResponse},
        webhook::{EventType, WebhookEvent, WebhookVerifier},
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://app.northrelay.ca";
