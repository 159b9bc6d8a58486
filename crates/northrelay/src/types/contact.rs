//! Contact and contact list types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn subscribed_by_default() -> bool {
    true
}

/// A recipient known to the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact ID
    pub id: String,
    /// Address
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Arbitrary attributes
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Whether the contact accepts marketing email
    #[serde(default = "subscribed_by_default")]
    pub subscribed: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Request to create or upsert a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    /// Address
    pub email: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Arbitrary attributes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Whether the contact accepts marketing email
    pub subscribed: bool,
}

impl CreateContactRequest {
    /// Subscribed contact for `email`.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            metadata: None,
            subscribed: true,
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A named group of contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactList {
    /// List ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Number of members
    #[serde(default)]
    pub contact_count: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Filters for listing contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsParams {
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Match against email or name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Only members of this list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    /// Comma-separated tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}
