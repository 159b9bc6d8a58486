//! Delivery event history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::webhook::EventType;

/// A recorded delivery event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEvent {
    /// Event ID
    pub id: String,
    /// Event type
    #[serde(rename = "type", alias = "eventType")]
    pub event_type: EventType,
    /// Message the event belongs to
    #[serde(default)]
    pub message_id: Option<String>,
    /// Recipient address
    #[serde(default)]
    pub recipient: Option<String>,
    /// When the event happened
    #[serde(default, alias = "createdAt")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Any further fields, as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsParams {
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only this event type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    /// Only events of this message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Only events for this recipient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Events at or after this time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Events before this time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}
