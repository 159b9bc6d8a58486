//! Webhook endpoint types

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::webhook::{EventType, WebhookVerifier};

/// A registered webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Webhook ID
    pub id: String,
    /// Delivery URL
    pub url: String,
    /// Subscribed event types
    #[serde(default)]
    pub events: Vec<EventType>,
    /// Whether deliveries are enabled
    #[serde(default)]
    pub active: bool,
    /// Signing secret, when the endpoint returns it
    #[serde(default)]
    pub secret: Option<SecretString>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Webhook {
    /// Verifier for deliveries to this endpoint, if its secret is known.
    pub fn verifier(&self) -> Option<WebhookVerifier> {
        self.secret.clone().map(WebhookVerifier::from_secret)
    }
}

/// Request to register a webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    /// Delivery URL
    pub url: String,
    /// Event types to deliver
    pub events: Vec<EventType>,
    /// Enable immediately
    pub active: bool,
}

impl CreateWebhookRequest {
    /// Active endpoint at `url` for `events`.
    pub fn new(url: impl Into<String>, events: impl IntoIterator<Item = EventType>) -> Self {
        Self {
            url: url.into(),
            events: events.into_iter().collect(),
            active: true,
        }
    }
}

/// Partial update of a webhook endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWebhookRequest {
    /// Delivery URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Event types to deliver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventType>>,
    /// Enable or disable deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Result of a test delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTestResult {
    /// Whether the endpoint acknowledged the delivery
    pub delivered: bool,
    /// HTTP status the endpoint answered with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_webhook_deserialization_keeps_secret_hidden() {
        let webhook: Webhook = serde_json::from_value(json!({
            "id": "wh_1",
            "url": "https://example.com/hooks",
            "events": ["delivered", "bounced", "future_event"],
            "active": true,
            "secret": "whsec_abc",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(webhook.events[1], EventType::Bounced);
        assert_eq!(webhook.events[2], EventType::Unrecognized("future_event".into()));
        assert_eq!(
            webhook.secret.as_ref().map(|s| s.expose_secret()),
            Some("whsec_abc")
        );
        assert!(!format!("{webhook:?}").contains("whsec_abc"));
        assert!(webhook.verifier().is_some());
    }

    #[test]
    fn test_create_request_serialization() {
        let request =
            CreateWebhookRequest::new("https://example.com/hooks", [EventType::Delivered]);
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"url": "https://example.com/hooks", "events": ["delivered"], "active": true})
        );
    }
}
