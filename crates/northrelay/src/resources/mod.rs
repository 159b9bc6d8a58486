//! API resource endpoints
//!
//! Each resource is a thin view over a [`Client`], obtained from accessors
//! such as [`Client::emails`]. All calls share the client's retry policy,
//! rate-limit tracker, and cancellation token.

pub mod analytics;
pub mod api_keys;
pub mod brand_theme;
pub mod campaigns;
pub mod contacts;
pub mod domains;
pub mod emails;
pub mod metrics;
pub mod events;
pub mod templates;
pub mod webhooks;

pub use analytics::Analytics;
pub use api_keys::ApiKeys;
pub use brand_theme::BrandThemes;
pub use campaigns::Campaigns;
pub use contacts::Contacts;
pub use domains::Domains;
pub use emails::Emails;
pub use events::Events;
pub use metrics::Metrics;
pub use templates::Templates;
pub use webhooks::Webhooks;

use crate::client::Client;
use crate::error::{Error, Result};

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &Client;
}

/// Join `collection` and an ID into a request path.
///
/// IDs are opaque and go into the path verbatim, so anything that would change
/// the path structure is rejected.
pub(crate) fn item_path(collection: &str, id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(Error::InvalidRequest(format!(
            "ID for {collection} cannot be empty"
        )));
    }
    if id
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidRequest(format!(
            "ID for {collection} contains reserved characters: {id:?}"
        )));
    }
    Ok(format!("{collection}/{id}"))
}

macro_rules! impl_resource {
    ($($name:ident),+ $(,)?) => {
        $(
            impl Resource for $name<'_> {
                fn client(&self) -> &Client {
                    self.client
                }
            }
        )+
    };
}

impl_resource!(
    Analytics,
    ApiKeys,
    BrandThemes,
    Campaigns,
    Contacts,
    Domains,
    Emails,
    Events,
    Metrics,
    Templates,
    Webhooks,
);


#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_item_path() {
        assert_eq!(
            item_path("/api/v1/templates", "tpl_1").unwrap(),
            "/api/v1/templates/tpl_1"
        );
        assert_matches!(item_path("/api/v1/templates", ""), Err(Error::InvalidRequest(_)));
        assert_matches!(
            item_path("/api/v1/templates", "../admin"),
            Err(Error::InvalidRequest(_))
        );
        assert_matches!(
            item_path("/api/v1/templates", "a?b=c"),
            Err(Error::InvalidRequest(_))
        );
    }

    #[test]
    fn test_resources_expose_their_client() {
        let client = Client::new("nr_test_key").unwrap();
        assert!(std::ptr::eq(client.emails().client(), &client));
        assert!(std::ptr::eq(client.campaigns().client(), &client));
        assert!(std::ptr::eq(client.analytics().client(), &client));
        assert!(std::ptr::eq(client.brand_themes().client(), &client));
    }
}
