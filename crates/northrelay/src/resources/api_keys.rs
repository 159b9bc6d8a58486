//! API keys endpoint

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{ApiKey, CreateApiKeyRequest, CreatedApiKey, PaginatedResponse},
};

const API_KEYS_PATH: &str = "/api/v1/api-keys";

/// API key management.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeys<'a> {
    pub(super) client: &'a Client,
}

impl<'a> ApiKeys<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List the account's keys.
    pub async fn list(&self) -> Result<PaginatedResponse<ApiKey>> {
        self.client.execute(ApiRequest::get(API_KEYS_PATH)).await
    }

    /// Create a key. Store [`CreatedApiKey::key`] now; it cannot be fetched again.
    pub async fn create(&self, request: &CreateApiKeyRequest) -> Result<CreatedApiKey> {
        self.client
            .execute(ApiRequest::post(API_KEYS_PATH).json(request)?)
            .await
    }

    /// Revoke a key.
    pub async fn revoke(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(API_KEYS_PATH, id)?))
            .await
    }
}
