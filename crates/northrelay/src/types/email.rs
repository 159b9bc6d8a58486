//! Transactional email types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Address, e.g. `user@example.com`
    pub email: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    /// Address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Address with a display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

impl From<&str> for EmailAddress {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for EmailAddress {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

/// Subject and body of an email, or a reference to a stored template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    /// Subject line (empty when a template provides it)
    pub subject: String,
    /// HTML body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Plain-text body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Stored template to render instead of `html`/`text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl EmailContent {
    /// HTML email.
    pub fn html(subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            html: Some(html.into()),
            ..Default::default()
        }
    }

    /// Plain-text email.
    pub fn text(subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Content rendered from a stored template; the subject comes from the template.
    pub fn template(template_id: impl Into<String>) -> Self {
        Self {
            template_id: Some(template_id.into()),
            ..Default::default()
        }
    }

    /// Add a plain-text alternative.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Request to send a transactional email.
///
/// # Example
///
/// ```rust
/// use northrelay::types::{EmailAddress, EmailContent, SendEmailRequest};
///
/// let request = SendEmailRequest::builder()
///     .from(EmailAddress::with_name("noreply@example.com", "Example"))
///     .to(vec![EmailAddress::new("user@example.com")])
///     .content(EmailContent::html("Welcome!", "<h1>Welcome</h1>"))
///     .build()
///     .unwrap();
/// assert_eq!(request.to.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option))]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    /// Sender
    pub from: EmailAddress,

    /// Recipients
    pub to: Vec<EmailAddress>,

    /// Carbon-copy recipients
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub cc: Option<Vec<EmailAddress>>,

    /// Blind carbon-copy recipients
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub bcc: Option<Vec<EmailAddress>>,

    /// Reply-to address
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub reply_to: Option<EmailAddress>,

    /// Subject and body
    pub content: EmailContent,

    /// Template variable substitutions
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub variables: Option<Map<String, Value>>,

    /// Brand theme to apply
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub theme_id: Option<String>,

    /// Custom tags for filtering events
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub tags: Option<BTreeMap<String, String>>,

    /// Extra MIME headers
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub headers: Option<BTreeMap<String, String>>,

    /// Attachments, passed through as given
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub attachments: Option<Vec<Value>>,

    /// Delivery time for scheduled sends
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl SendEmailRequest {
    /// Create a builder for constructing a SendEmailRequest.
    pub fn builder() -> SendEmailRequestBuilder {
        SendEmailRequestBuilder::default()
    }
}

/// Email quota state returned with a send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaInfo {
    /// Allowance for the period
    pub limit: u64,
    /// Units used so far
    pub used: u64,
    /// Units left
    pub remaining: u64,
    /// `daily` or `monthly`
    pub period: String,
}

/// Result of a send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    /// Whether the platform accepted the email
    pub success: bool,
    /// ID for tracking events
    pub message_id: String,
    /// Quota after this send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaInfo>,
}

/// Result of validating an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailValidation {
    /// Whether the address looks deliverable
    pub valid: bool,
    /// Why it was rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Confidence score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn minimal_request() -> SendEmailRequest {
        SendEmailRequest::builder()
            .from("noreply@example.com")
            .to(vec![EmailAddress::with_name("user@example.com", "User")])
            .content(EmailContent::html("Hi", "<p>Hi</p>"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_minimal_request_serialization() {
        let value = serde_json::to_value(minimal_request()).unwrap();
        assert_eq!(
            value,
            json!({
                "from": {"email": "noreply@example.com"},
                "to": [{"email": "user@example.com", "name": "User"}],
                "content": {"subject": "Hi", "html": "<p>Hi</p>"}
            })
        );
    }

    #[test]
    fn test_optional_fields_use_camel_case() {
        let mut request = minimal_request();
        request.reply_to = Some(EmailAddress::new("support@example.com"));
        request.theme_id = Some("theme_1".into());
        request.scheduled_for = Some(Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap());
        request.content = EmailContent::template("tpl_1");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["replyTo"]["email"], "support@example.com");
        assert_eq!(value["themeId"], "theme_1");
        assert_eq!(value["scheduledFor"], "2030-01-01T09:00:00Z");
        assert_eq!(value["content"], json!({"subject": "", "templateId": "tpl_1"}));
    }

    #[test]
    fn test_builder_requires_recipients_and_content() {
        let result = SendEmailRequest::builder().from("noreply@example.com").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_send_response_deserialization() {
        let response: SendEmailResponse = serde_json::from_value(json!({
            "success": true,
            "messageId": "msg_123",
            "quota": {"limit": 1000, "used": 10, "remaining": 990, "period": "monthly"}
        }))
        .unwrap();

        assert_eq!(response.message_id, "msg_123");
        assert_eq!(response.quota.unwrap().remaining, 990);
    }
}
