//! Sending domains API endpoint

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{
        CreateDomainRequest, DataEnvelope, Domain, DomainVerification, PageParams,
        PaginatedResponse,
    },
};

const DOMAINS_PATH: &str = "/api/v1/domains";

/// Sending domains API resource.
#[derive(Debug, Clone, Copy)]
pub struct Domains<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List sending domains.
    pub async fn list(&self, params: PageParams) -> Result<PaginatedResponse<Domain>> {
        self.client
            .execute(ApiRequest::get(DOMAINS_PATH).query_params(&params)?)
            .await
    }

    /// Get a domain with its DNS records.
    pub async fn get(&self, id: &str) -> Result<Domain> {
        let envelope: DataEnvelope<Domain> = self
            .client
            .execute(ApiRequest::get(item_path(DOMAINS_PATH, id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Register a domain. The response lists the DNS records to publish.
    pub async fn create(&self, request: &CreateDomainRequest) -> Result<Domain> {
        let envelope: DataEnvelope<Domain> = self
            .client
            .execute(ApiRequest::post(DOMAINS_PATH).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Re-check the domain's DNS records.
    pub async fn verify(&self, id: &str) -> Result<DomainVerification> {
        let path = format!("{}/verify", item_path(DOMAINS_PATH, id)?);
        let envelope: DataEnvelope<DomainVerification> =
            self.client.execute(ApiRequest::post(path)).await?;
        Ok(envelope.into_inner())
    }

    /// Remove a domain.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(DOMAINS_PATH, id)?))
            .await
    }
}
