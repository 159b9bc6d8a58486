//! Emails API endpoint

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{EmailAddress, EmailContent, EmailValidation, SendEmailRequest, SendEmailResponse},
};

const SEND_PATH: &str = "/api/v1/emails/send";
const SCHEDULE_PATH: &str = "/api/v1/emails/schedule";
const BATCH_PATH: &str = "/api/v1/emails/batch";
const VALIDATE_PATH: &str = "/api/v1/emails/validate";

/// Emails API resource.
///
/// # Example
///
/// ```rust,no_run
/// # use northrelay::Client;
/// # use northrelay::types::{EmailAddress, EmailContent, SendEmailRequest};
/// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
/// let request = SendEmailRequest::builder()
///     .from(EmailAddress::with_name("noreply@example.com", "Example"))
///     .to(vec![EmailAddress::new("user@example.com")])
///     .content(EmailContent::html("Welcome!", "<h1>Welcome</h1>"))
///     .build()?;
///
/// let sent = client.emails().send(&request).await?;
/// println!("{}", sent.message_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Emails<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Emails<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Send a transactional email.
    pub async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse> {
        self.client
            .execute(ApiRequest::post(SEND_PATH).json(request)?)
            .await
    }

    /// Send an email rendered from a stored template.
    ///
    /// The subject comes from the template.
    pub async fn send_template(
        &self,
        template_id: impl Into<String>,
        from: EmailAddress,
        to: Vec<EmailAddress>,
        variables: Map<String, Value>,
    ) -> Result<SendEmailResponse> {
        let request = SendEmailRequest {
            from,
            to,
            cc: None,
            bcc: None,
            reply_to: None,
            content: EmailContent::template(template_id),
            variables: Some(variables),
            theme_id: None,
            tags: None,
            headers: None,
            attachments: None,
            scheduled_for: None,
        };
        self.send(&request).await
    }

    /// Schedule an email for delivery at `scheduled_for`.
    ///
    /// Overrides any `scheduled_for` already set on `request`.
    pub async fn schedule(
        &self,
        request: &SendEmailRequest,
        scheduled_for: DateTime<Utc>,
    ) -> Result<Value> {
        let mut request = request.clone();
        request.scheduled_for = Some(scheduled_for);
        self.client
            .execute(ApiRequest::post(SCHEDULE_PATH).json(&request)?)
            .await
    }

    /// Send several emails in one call.
    pub async fn send_batch(&self, emails: &[SendEmailRequest]) -> Result<Value> {
        self.client
            .execute(ApiRequest::post(BATCH_PATH).json(&json!({ "emails": emails }))?)
            .await
    }

    /// Check whether an address looks deliverable.
    pub async fn validate(&self, email: &str) -> Result<EmailValidation> {
        self.client
            .execute(ApiRequest::post(VALIDATE_PATH).json(&json!({ "email": email }))?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::client_replying;
    use chrono::TimeZone;
    use http::Method;

    fn request() -> SendEmailRequest {
        SendEmailRequest::builder()
            .from("noreply@example.com")
            .to(vec![EmailAddress::new("user@example.com")])
            .content(EmailContent::text("Hi", "Hello"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_send() {
        let (client, provider) =
            client_replying(json!({"success": true, "messageId": "msg_1"}));

        let response = client.emails().send(&request()).await.unwrap();

        assert_eq!(response.message_id, "msg_1");
        let sent = provider.last();
        assert_eq!(sent.method(), &Method::POST);
        assert_eq!(sent.path(), SEND_PATH);
        assert_eq!(provider.last_body()["content"]["text"], "Hello");
    }

    #[tokio::test]
    async fn test_send_template_uses_template_content() {
        let (client, provider) =
            client_replying(json!({"success": true, "messageId": "msg_2"}));

        let mut variables = Map::new();
        variables.insert("name".into(), json!("Ada"));
        client
            .emails()
            .send_template(
                "tpl_welcome",
                EmailAddress::new("noreply@example.com"),
                vec![EmailAddress::new("ada@example.com")],
                variables,
            )
            .await
            .unwrap();

        let body = provider.last_body();
        assert_eq!(body["content"], json!({"subject": "", "templateId": "tpl_welcome"}));
        assert_eq!(body["variables"]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_schedule_sets_delivery_time() {
        let (client, provider) = client_replying(json!({"scheduleId": "sch_1"}));
        let when = Utc.with_ymd_and_hms(2030, 6, 1, 8, 0, 0).unwrap();

        let result = client.emails().schedule(&request(), when).await.unwrap();

        assert_eq!(result["scheduleId"], "sch_1");
        assert_eq!(provider.last().path(), SCHEDULE_PATH);
        assert_eq!(provider.last_body()["scheduledFor"], "2030-06-01T08:00:00Z");
    }

    #[tokio::test]
    async fn test_send_batch_wraps_emails() {
        let (client, provider) = client_replying(json!({"accepted": 2}));

        client
            .emails()
            .send_batch(&[request(), request()])
            .await
            .unwrap();

        assert_eq!(provider.last().path(), BATCH_PATH);
        assert_eq!(provider.last_body()["emails"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_validate() {
        let (client, provider) = client_replying(json!({"valid": false, "reason": "no MX"}));

        let result = client.emails().validate("nobody@invalid.test").await.unwrap();

        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("no MX"));
        assert_eq!(provider.last_body(), json!({"email": "nobody@invalid.test"}));
    }
}
