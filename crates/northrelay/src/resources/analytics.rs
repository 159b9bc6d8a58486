//! Analytics API endpoint

use serde_json::Value;

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{AnalyticsExport, AnalyticsExportRequest, AnalyticsQuery, DateRange},
};

const ANALYTICS_PATH: &str = "/api/v1/analytics";
const EXPORT_PATH: &str = "/api/v1/analytics/export";

/// Analytics API resource.
///
/// Report bodies vary with the requested grouping and metrics, so they are
/// returned as JSON values.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Analytics<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Aggregate delivery and engagement figures.
    pub async fn query(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.report("query", query).await
    }

    /// Opens and clicks by weekday and hour.
    pub async fn engagement_heatmap(&self, range: &DateRange) -> Result<Value> {
        self.report("engagement-heatmap", range).await
    }

    /// Engagement by recipient country.
    pub async fn geographic(&self, range: &DateRange) -> Result<Value> {
        self.report("geographic", range).await
    }

    /// Delivery by mailbox provider.
    pub async fn providers(&self, range: &DateRange) -> Result<Value> {
        self.report("providers", range).await
    }

    /// Start an export job.
    pub async fn request_export(&self, request: &AnalyticsExportRequest) -> Result<AnalyticsExport> {
        self.client
            .execute(ApiRequest::post(EXPORT_PATH).json(request)?)
            .await
    }

    /// Poll an export job.
    pub async fn get_export(&self, export_id: &str) -> Result<AnalyticsExport> {
        self.client
            .execute(ApiRequest::get(item_path(EXPORT_PATH, export_id)?))
            .await
    }

    async fn report<P: serde::Serialize>(&self, name: &str, params: &P) -> Result<Value> {
        self.client
            .execute(ApiRequest::get(format!("{ANALYTICS_PATH}/{name}")).query_params(params)?)
            .await
    }
}
