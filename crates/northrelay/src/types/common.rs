//! Shared response wrappers and query parameters

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Total items across all pages
    #[serde(default)]
    pub total: u64,
    /// 1-based page number
    #[serde(default = "first_page")]
    pub page: u32,
    /// Page size
    #[serde(default)]
    pub limit: u32,
    /// Whether another page follows
    #[serde(default)]
    pub has_more: bool,
}

fn first_page() -> u32 {
    1
}

impl<T> PaginatedResponse<T> {
    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this page is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Parameters for the following page, if there is one.
    pub fn next_page(&self) -> Option<PageParams> {
        self.has_more.then(|| PageParams {
            page: Some(self.page.saturating_add(1)),
            limit: (self.limit > 0).then_some(self.limit),
        })
    }
}

impl<T> IntoIterator for PaginatedResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// `{"data": ...}` wrapper used by single-object endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Wrapped payload
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Unwrap the payload.
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Page selection for list endpoints without other filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageParams {
    /// 1-based page number (server default 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size (server default 20)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PageParams {
    /// Select `page` with `limit` items per page.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_response_deserialization() {
        let page: PaginatedResponse<String> = serde_json::from_value(json!({
            "data": ["a", "b"],
            "total": 12,
            "page": 2,
            "limit": 2,
            "hasMore": true
        }))
        .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.total, 12);
        assert_eq!(page.next_page(), Some(PageParams::new(3, 2)));
        assert_eq!(page.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_bare_data_list_uses_defaults() {
        let page: PaginatedResponse<u32> = serde_json::from_value(json!({"data": [1]})).unwrap();
        assert_eq!(page.page, 1);
        assert!(!page.has_more);
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn test_page_params_skip_unset() {
        assert_eq!(serde_json::to_value(PageParams::default()).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(PageParams::new(1, 50)).unwrap(),
            json!({"page": 1, "limit": 50})
        );
    }
}
