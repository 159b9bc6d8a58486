//! Brand theme endpoint
//!
//! Themes are addressed by an `id` query parameter; omitting it targets the
//! account's default theme.

use crate::{
    client::Client,
    error::{Error, Result},
    http::ApiRequest,
    types::{BrandTheme, CreateBrandThemeRequest, DataEnvelope},
};

const BRAND_THEME_PATH: &str = "/api/v1/brand-theme";

/// Brand theme resource.
#[derive(Debug, Clone, Copy)]
pub struct BrandThemes<'a> {
    pub(super) client: &'a Client,
}

impl<'a> BrandThemes<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Get the theme `id`, or the default theme when `None`.
    pub async fn get(&self, id: Option<&str>) -> Result<BrandTheme> {
        let envelope: DataEnvelope<BrandTheme> = self
            .client
            .execute(ApiRequest::get(BRAND_THEME_PATH).query_opt("id", theme_id(id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Every theme on the account.
    pub async fn list(&self) -> Result<Vec<BrandTheme>> {
        let envelope: DataEnvelope<Vec<BrandTheme>> = self
            .client
            .execute(ApiRequest::get(BRAND_THEME_PATH).query("all", true))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Create a theme.
    pub async fn create(&self, request: &CreateBrandThemeRequest) -> Result<BrandTheme> {
        let envelope: DataEnvelope<BrandTheme> = self
            .client
            .execute(ApiRequest::post(BRAND_THEME_PATH).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Replace the theme `id`, or the default theme when `None`.
    pub async fn update(
        &self,
        request: &CreateBrandThemeRequest,
        id: Option<&str>,
    ) -> Result<BrandTheme> {
        let envelope: DataEnvelope<BrandTheme> = self
            .client
            .execute(
                ApiRequest::put(BRAND_THEME_PATH)
                    .query_opt("id", theme_id(id)?)
                    .json(request)?,
            )
            .await?;
        Ok(envelope.into_inner())
    }

    /// Delete the theme `id`.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(BRAND_THEME_PATH).query_opt("id", theme_id(Some(id))?))
            .await
    }
}

fn theme_id(id: Option<&str>) -> Result<Option<&str>> {
    match id {
        Some("") => Err(Error::InvalidRequest(
            "ID for /api/v1/brand-theme cannot be empty".to_string(),
        )),
        other => Ok(other),
    }
}
