//! Campaigns API endpoint
//!
//! Campaigns move through review before they can be sent:
//! draft, [`submit`](Campaigns::submit), then [`approve`](Campaigns::approve)
//! or [`reject`](Campaigns::reject), then [`send`](Campaigns::send).

use serde_json::{Value, json};

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{
        Campaign, CreateCampaignRequest, DataEnvelope, ListCampaignsParams, PaginatedResponse,
        UpdateCampaignRequest,
    },
};

const CAMPAIGNS_PATH: &str = "/api/v1/campaigns";

/// Campaigns API resource.
#[derive(Debug, Clone, Copy)]
pub struct Campaigns<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List campaigns.
    pub async fn list(&self, params: &ListCampaignsParams) -> Result<PaginatedResponse<Campaign>> {
        self.client
            .execute(ApiRequest::get(CAMPAIGNS_PATH).query_params(params)?)
            .await
    }

    /// Get a campaign.
    pub async fn get(&self, id: &str) -> Result<Campaign> {
        let envelope: DataEnvelope<Campaign> = self
            .client
            .execute(ApiRequest::get(item_path(CAMPAIGNS_PATH, id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Create a draft campaign.
    pub async fn create(&self, request: &CreateCampaignRequest) -> Result<Campaign> {
        let envelope: DataEnvelope<Campaign> = self
            .client
            .execute(ApiRequest::post(CAMPAIGNS_PATH).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Update a campaign; unset fields are left unchanged.
    pub async fn update(&self, id: &str, request: &UpdateCampaignRequest) -> Result<Campaign> {
        let envelope: DataEnvelope<Campaign> = self
            .client
            .execute(ApiRequest::patch(item_path(CAMPAIGNS_PATH, id)?).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Delete a campaign.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(CAMPAIGNS_PATH, id)?))
            .await
    }

    /// Rendered HTML of the campaign's email.
    pub async fn preview(&self, id: &str) -> Result<String> {
        let envelope: DataEnvelope<String> = self
            .client
            .execute(ApiRequest::get(action_path(id, "preview")?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Submit a draft for review.
    pub async fn submit(&self, id: &str) -> Result<Value> {
        self.client
            .execute(ApiRequest::post(action_path(id, "submit")?))
            .await
    }

    /// Approve a submitted campaign.
    pub async fn approve(&self, id: &str) -> Result<Value> {
        self.client
            .execute(ApiRequest::post(action_path(id, "approve")?))
            .await
    }

    /// Send a submitted campaign back with `reason`.
    pub async fn reject(&self, id: &str, reason: &str) -> Result<Value> {
        self.client
            .execute(ApiRequest::post(action_path(id, "reject")?).json(&json!({ "reason": reason }))?)
            .await
    }

    /// Start sending an approved campaign.
    pub async fn send(&self, id: &str) -> Result<Value> {
        self.client
            .execute(ApiRequest::post(action_path(id, "send")?))
            .await
    }

    /// Progress of a campaign that is sending.
    pub async fn send_status(&self, id: &str) -> Result<Value> {
        self.client
            .execute(ApiRequest::get(action_path(id, "send")?))
            .await
    }
}

fn action_path(id: &str, action: &str) -> Result<String> {
    Ok(format!("{}/{action}", item_path(CAMPAIGNS_PATH, id)?))
}
