//! Analytics and delivery metrics types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Optional reporting window, sent as `startDate`/`endDate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    /// Window from `start_date` through `end_date`.
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }
}

/// Parameters for an analytics query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// Reporting window
    #[serde(flatten)]
    pub range: DateRange,
    /// Bucket results by this dimension (for example `day`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    /// Metrics to return; all when empty
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_separated")]
    pub metrics: Vec<String>,
}

fn comma_separated<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&values.join(","))
}

/// File format of an analytics export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// JSON document
    Json,
}

/// Request to export analytics for a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsExportRequest {
    /// First day included
    pub start_date: NaiveDate,
    /// Last day included
    pub end_date: NaiveDate,
    /// Output format
    pub format: ExportFormat,
}

impl AnalyticsExportRequest {
    /// CSV export of `start_date` through `end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            format: ExportFormat::default(),
        }
    }
}

/// State of an analytics export job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsExport {
    /// Export job ID
    #[serde(default, alias = "exportId")]
    pub id: Option<String>,
    /// Job status, such as `pending` or `completed`
    #[serde(default)]
    pub status: Option<String>,
    /// Where to fetch the file once the job completes
    #[serde(default, alias = "url")]
    pub download_url: Option<String>,
    /// Any further fields, as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for delivery metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsParams {
    /// Reporting window
    #[serde(flatten)]
    pub range: DateRange,
    /// Only this IP pool type (for example `shared` or `dedicated`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_query_serializes_flat_camel_case() {
        let query = AnalyticsQuery {
            range: DateRange::between(day(1), day(31)),
            group_by: Some("day".into()),
            metrics: vec!["delivered".into(), "opened".into()],
        };

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "startDate": "2025-01-01",
                "endDate": "2025-01-31",
                "groupBy": "day",
                "metrics": "delivered,opened"
            })
        );
    }

    #[test]
    fn test_empty_query_has_no_fields() {
        assert_eq!(
            serde_json::to_value(AnalyticsQuery::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_export_request_defaults_to_csv() {
        let request = AnalyticsExportRequest::new(day(1), day(7));
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"startDate": "2025-01-01", "endDate": "2025-01-07", "format": "csv"})
        );
    }

    #[test]
    fn test_export_accepts_alternate_id_field() {
        let export: AnalyticsExport = serde_json::from_value(json!({
            "exportId": "exp_1",
            "status": "pending",
            "rows": 0
        }))
        .unwrap();

        assert_eq!(export.id.as_deref(), Some("exp_1"));
        assert_eq!(export.download_url, None);
        assert_eq!(export.extra["rows"], 0);
    }
}
