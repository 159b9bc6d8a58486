//! Delivery metrics API endpoint

use serde_json::Value;

use crate::{client::Client, error::Result, http::ApiRequest, types::MetricsParams};

const METRICS_PATH: &str = "/api/v1/metrics";
const SUMMARY_PATH: &str = "/api/v1/metrics/summary";

/// Delivery metrics resource.
#[derive(Debug, Clone, Copy)]
pub struct Metrics<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Metrics<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Delivery metrics, optionally narrowed to a window and pool type.
    pub async fn get(&self, params: &MetricsParams) -> Result<Value> {
        self.client
            .execute(ApiRequest::get(METRICS_PATH).query_params(params)?)
            .await
    }

    /// Headline figures for `period`, such as `today`, `week` or `month`.
    pub async fn summary(&self, period: &str) -> Result<Value> {
        self.client
            .execute(ApiRequest::get(SUMMARY_PATH).query("period", period))
            .await
    }
}
