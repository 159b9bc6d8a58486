//! Brand theme types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colors, logo and font applied to rendered emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandTheme {
    /// Theme ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Named colors, such as `primary` to `#0055ff`
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    /// Logo image URL
    #[serde(default)]
    pub logo_url: Option<String>,
    /// CSS font family
    #[serde(default)]
    pub font_family: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Request to create or replace a brand theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandThemeRequest {
    /// Display name
    pub name: String,
    /// Named colors
    pub colors: BTreeMap<String, String>,
    /// Logo image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// CSS font family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl CreateBrandThemeRequest {
    /// Theme named `name` with `colors`.
    pub fn new<K, V>(name: impl Into<String>, colors: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            colors: colors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            logo_url: None,
            font_family: None,
        }
    }
}
