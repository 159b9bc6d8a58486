//! Request and response models for the NorthRelay API
//!
//! Field names follow Rust conventions and map to the camelCase wire format
//! through serde.

pub use analytics::*;
pub use api_key::*;
pub use brand_theme::*;
pub use campaign::*;
pub use common::*;
pub use contact::*;
pub use domain::*;
pub use email::*;
pub use event::*;
pub use template::*;
pub use webhook::*;

pub mod analytics;
pub mod api_key;
pub mod brand_theme;
pub mod campaign;
pub mod common;
pub mod contact;
pub mod domain;
pub mod email;
pub mod event;
pub mod template;
pub mod webhook;
