//! API key management types

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An API key as listed by the account. The secret is never included.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Key ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Permission scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Expiry, if the key has one
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Any further fields, as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A freshly created key. The secret is only returned this once.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedApiKey {
    /// Secret to authenticate with
    #[serde(alias = "secret", alias = "apiKey")]
    pub key: SecretString,
    /// Key metadata
    #[serde(flatten)]
    pub details: ApiKey,
}

/// Request to create an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    /// Display name
    pub name: String,
    /// Permission scopes
    pub scopes: Vec<String>,
    /// Optional expiry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateApiKeyRequest {
    /// Non-expiring key named `name` with `scopes`.
    pub fn new(name: impl Into<String>, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            expires_at: None,
        }
    }

    /// Expire the key at `expires_at`.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_create_request_omits_missing_expiry() {
        let request = CreateApiKeyRequest::new("ci", ["emails:send"]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "ci", "scopes": ["emails:send"]})
        );

        let expiring = request.expires_at(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            serde_json::to_value(&expiring).unwrap()["expiresAt"],
            "2026-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_created_key_splits_secret_from_details() {
        let created: CreatedApiKey = serde_json::from_value(json!({
            "id": "key_1",
            "name": "ci",
            "scopes": ["emails:send"],
            "key": "nr_live_abc123",
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(created.key.expose_secret(), "nr_live_abc123");
        assert_eq!(created.details.id, "key_1");
        assert!(!created.details.extra.contains_key("key"));
        assert!(!format!("{created:?}").contains("abc123"));
    }
}
