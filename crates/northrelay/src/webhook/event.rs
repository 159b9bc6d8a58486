//! Webhook event payloads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of delivery event a webhook reports.
///
/// Values added server-side after this client was built deserialize as
/// [`EventType::Unrecognized`] and serialize back unchanged.
///
/// Build values with [`EventType::from`] rather than naming
/// `Unrecognized` directly: an `Unrecognized` holding a known wire name
/// (such as `"sent"`) reads back as the known variant.
/// [`EventType::normalized`] applies that mapping up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Accepted by the platform and handed to the sending infrastructure
    Sent,
    /// Accepted by the recipient's mail server
    Delivered,
    /// Rejected by the recipient's mail server
    Bounced,
    /// Opened by the recipient
    Opened,
    /// A tracked link was clicked
    Clicked,
    /// Marked as spam by the recipient
    Complained,
    /// The recipient unsubscribed
    Unsubscribed,
    /// Dropped before sending (suppression list, invalid address)
    Dropped,
    /// Delivery failed permanently
    Failed,
    /// A type this client does not know yet
    ///
    /// Only produced by [`EventType::from`] for names outside the known set.
    Unrecognized(String),
}

impl EventType {
    /// Wire name of the event type.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Sent => "sent",
            EventType::Delivered => "delivered",
            EventType::Bounced => "bounced",
            EventType::Opened => "opened",
            EventType::Clicked => "clicked",
            EventType::Complained => "complained",
            EventType::Unsubscribed => "unsubscribed",
            EventType::Dropped => "dropped",
            EventType::Failed => "failed",
            EventType::Unrecognized(other) => other,
        }
    }

    /// Whether this is one of the known types.
    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Unrecognized(_))
    }

    /// Map an `Unrecognized` value holding a known wire name to that variant.
    pub fn normalized(self) -> Self {
        match self {
            EventType::Unrecognized(name) => EventType::from(name),
            known => known,
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sent" => EventType::Sent,
            "delivered" => EventType::Delivered,
            "bounced" => EventType::Bounced,
            "opened" => EventType::Opened,
            "clicked" => EventType::Clicked,
            "complained" => EventType::Complained,
            "unsubscribed" => EventType::Unsubscribed,
            "dropped" => EventType::Dropped,
            "failed" => EventType::Failed,
            _ => EventType::Unrecognized(value),
        }
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        EventType::from(value.to_string())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Unrecognized(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified webhook delivery.
///
/// Only obtainable from a payload whose signature checked out, via
/// [`parse_event`](super::parse_event) or [`WebhookVerifier`](super::WebhookVerifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event ID
    pub id: String,
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Message the event refers to
    pub message_id: String,
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Event-specific fields (recipient, bounce reason, clicked URL, ...)
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_types_roundtrip_through_wire_names() {
        for name in [
            "sent",
            "delivered",
            "bounced",
            "opened",
            "clicked",
            "complained",
            "unsubscribed",
            "dropped",
            "failed",
        ] {
            let event_type = EventType::from(name);
            assert!(event_type.is_known(), "{name} should be known");
            assert_eq!(event_type.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let event_type: EventType = serde_json::from_str(r#""deferred""#).unwrap();
        assert_eq!(event_type, EventType::Unrecognized("deferred".into()));
        assert_eq!(serde_json::to_string(&event_type).unwrap(), r#""deferred""#);
    }

    #[test]
    fn test_unrecognized_known_name_normalizes() {
        let hand_built = EventType::Unrecognized("sent".into());
        assert!(!hand_built.is_known());

        let wire = serde_json::to_string(&hand_built).unwrap();
        let read_back: EventType = serde_json::from_str(&wire).unwrap();

        assert_eq!(read_back, EventType::Sent);
        assert_eq!(hand_built.clone().normalized(), read_back);
        assert_eq!(
            EventType::Unrecognized("deferred".into()).normalized(),
            EventType::Unrecognized("deferred".into())
        );
        assert_eq!(EventType::Opened.normalized(), EventType::Opened);
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{
            "id": "evt_123",
            "type": "bounced",
            "messageId": "msg_456",
            "timestamp": "2025-01-15T10:30:00Z",
            "data": {"recipient": "user@example.com", "reason": "mailbox full"}
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "evt_123");
        assert_eq!(event.event_type, EventType::Bounced);
        assert_eq!(event.message_id, "msg_456");
        assert_eq!(event.timestamp.to_rfc3339(), "2025-01-15T10:30:00+00:00");
        assert_eq!(event.data["reason"], "mailbox full");
    }

    #[test]
    fn test_data_defaults_to_empty() {
        let json = r#"{"id":"evt_1","type":"opened","messageId":"msg_1","timestamp":"2025-01-15T10:30:00Z"}"#;
        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert!(event.data.is_empty());
    }
}
