//! Delivery events API endpoint

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{DataEnvelope, EmailEvent, ListEventsParams, PaginatedResponse},
};

const EVENTS_PATH: &str = "/api/v1/events";

/// Delivery events API resource.
#[derive(Debug, Clone, Copy)]
pub struct Events<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Events<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List events matching `params`, newest first.
    pub async fn list(&self, params: &ListEventsParams) -> Result<PaginatedResponse<EmailEvent>> {
        self.client
            .execute(ApiRequest::get(EVENTS_PATH).query_params(params)?)
            .await
    }

    /// Get a single event.
    pub async fn get(&self, id: &str) -> Result<EmailEvent> {
        let envelope: DataEnvelope<EmailEvent> = self
            .client
            .execute(ApiRequest::get(item_path(EVENTS_PATH, id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// All events recorded for one message.
    pub async fn get_by_message_id(&self, message_id: &str) -> Result<Vec<EmailEvent>> {
        let envelope: DataEnvelope<Vec<EmailEvent>> = self
            .client
            .execute(ApiRequest::get(EVENTS_PATH).query("messageId", message_id))
            .await?;
        Ok(envelope.into_inner())
    }
}
