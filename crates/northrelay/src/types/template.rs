//! Template types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored email template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Template ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Subject line, may contain `{{variables}}`
    pub subject: String,
    /// HTML body
    #[serde(default)]
    pub html: Option<String>,
    /// MJML source
    #[serde(default)]
    pub mjml: Option<String>,
    /// Plain-text body
    #[serde(default)]
    pub text: Option<String>,
    /// Default variable values
    #[serde(default)]
    pub variables: Map<String, Value>,
    /// Variable names found in the template
    #[serde(default)]
    pub extracted_variables: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Request to create a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    /// Display name
    pub name: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// MJML source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mjml: Option<String>,
    /// Plain-text body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Default variable values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl CreateTemplateRequest {
    /// Request with a name and subject; set a body before sending.
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Set the HTML body.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the plain-text body.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Partial update of a template; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Subject line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// HTML body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// MJML source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mjml: Option<String>,
    /// Plain-text body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Default variable values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

/// Filters for listing templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesParams {
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Match against the template name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Only active templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_only: Option<bool>,
}

/// A template rendered with sample variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePreview {
    /// Rendered subject
    #[serde(default)]
    pub subject: Option<String>,
    /// Rendered HTML
    #[serde(default)]
    pub html: Option<String>,
    /// Rendered text
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_deserialization() {
        let template: Template = serde_json::from_value(json!({
            "id": "tpl_1",
            "name": "Welcome",
            "subject": "Welcome {{name}}",
            "html": "<h1>Hi {{name}}</h1>",
            "variables": {"name": "friend"},
            "extractedVariables": ["name"],
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(template.id, "tpl_1");
        assert_eq!(template.extracted_variables, vec!["name"]);
        assert!(template.text.is_none());
    }

    #[test]
    fn test_update_only_sends_set_fields() {
        let update = UpdateTemplateRequest {
            subject: Some("New".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({"subject": "New"}));
    }

    #[test]
    fn test_list_params_serialization() {
        let params = ListTemplatesParams {
            search: Some("welcome".into()),
            active_only: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({"search": "welcome", "activeOnly": true})
        );
    }
}
