//! Templates API endpoint

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{
        CreateTemplateRequest, DataEnvelope, ListTemplatesParams, PaginatedResponse, Template,
        TemplatePreview, UpdateTemplateRequest,
    },
};

const TEMPLATES_PATH: &str = "/api/v1/templates";

/// Templates API resource.
#[derive(Debug, Clone, Copy)]
pub struct Templates<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List templates.
    pub async fn list(&self, params: &ListTemplatesParams) -> Result<PaginatedResponse<Template>> {
        self.client
            .execute(ApiRequest::get(TEMPLATES_PATH).query_params(params)?)
            .await
    }

    /// Get a template by ID.
    pub async fn get(&self, id: &str) -> Result<Template> {
        let envelope: DataEnvelope<Template> = self
            .client
            .execute(ApiRequest::get(item_path(TEMPLATES_PATH, id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Create a template.
    pub async fn create(&self, request: &CreateTemplateRequest) -> Result<Template> {
        let envelope: DataEnvelope<Template> = self
            .client
            .execute(ApiRequest::post(TEMPLATES_PATH).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Update a template; unset fields are left unchanged.
    pub async fn update(&self, id: &str, request: &UpdateTemplateRequest) -> Result<Template> {
        let envelope: DataEnvelope<Template> = self
            .client
            .execute(ApiRequest::patch(item_path(TEMPLATES_PATH, id)?).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Delete a template.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(TEMPLATES_PATH, id)?))
            .await
    }

    /// Render a template with `variables`.
    pub async fn preview(
        &self,
        id: &str,
        variables: &Map<String, Value>,
    ) -> Result<TemplatePreview> {
        let path = format!("{}/preview", item_path(TEMPLATES_PATH, id)?);
        let envelope: DataEnvelope<TemplatePreview> = self
            .client
            .execute(ApiRequest::post(path).json(&json!({ "variables": variables }))?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Variable names referenced by `content`.
    pub async fn extract_variables(&self, content: &str) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct Extracted {
            variables: Vec<String>,
        }

        let envelope: DataEnvelope<Extracted> = self
            .client
            .execute(
                ApiRequest::post(format!("{TEMPLATES_PATH}/extract-variables"))
                    .json(&json!({ "content": content }))?,
            )
            .await?;
        Ok(envelope.data.variables)
    }
}
