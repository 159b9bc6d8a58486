//! Webhook endpoints API

use secrecy::SecretString;
use serde::Deserialize;

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{
        CreateWebhookRequest, DataEnvelope, PageParams, PaginatedResponse, UpdateWebhookRequest,
        Webhook, WebhookTestResult,
    },
};

const WEBHOOKS_PATH: &str = "/api/v1/webhooks";

/// Webhook endpoints API resource.
///
/// Registered endpoints receive signed deliveries; check them with
/// [`WebhookVerifier`](crate::webhook::WebhookVerifier).
#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List webhook endpoints.
    pub async fn list(&self, params: PageParams) -> Result<PaginatedResponse<Webhook>> {
        self.client
            .execute(ApiRequest::get(WEBHOOKS_PATH).query_params(&params)?)
            .await
    }

    /// Get a webhook endpoint.
    pub async fn get(&self, id: &str) -> Result<Webhook> {
        let envelope: DataEnvelope<Webhook> = self
            .client
            .execute(ApiRequest::get(item_path(WEBHOOKS_PATH, id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Register a webhook endpoint.
    ///
    /// The returned [`Webhook::secret`] is the signing secret for deliveries.
    pub async fn create(&self, request: &CreateWebhookRequest) -> Result<Webhook> {
        let envelope: DataEnvelope<Webhook> = self
            .client
            .execute(ApiRequest::post(WEBHOOKS_PATH).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Replace a webhook endpoint's settings.
    pub async fn update(&self, id: &str, request: &UpdateWebhookRequest) -> Result<Webhook> {
        let envelope: DataEnvelope<Webhook> = self
            .client
            .execute(ApiRequest::put(item_path(WEBHOOKS_PATH, id)?).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Remove a webhook endpoint.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(WEBHOOKS_PATH, id)?))
            .await
    }

    /// Issue a new signing secret. The old one stops working immediately.
    pub async fn rotate_secret(&self, id: &str) -> Result<SecretString> {
        #[derive(Deserialize)]
        struct Rotated {
            secret: SecretString,
        }

        let path = format!("{}/rotate-secret", item_path(WEBHOOKS_PATH, id)?);
        let envelope: DataEnvelope<Rotated> = self.client.execute(ApiRequest::post(path)).await?;
        Ok(envelope.data.secret)
    }

    /// Ask the server to send a test delivery to the endpoint.
    pub async fn test_delivery(&self, id: &str) -> Result<WebhookTestResult> {
        let path = format!("{}/test", item_path(WEBHOOKS_PATH, id)?);
        let envelope: DataEnvelope<WebhookTestResult> =
            self.client.execute(ApiRequest::post(path)).await?;
        Ok(envelope.into_inner())
    }
}
