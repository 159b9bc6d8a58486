//! Sending domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A DNS record the domain owner must publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// `TXT`, `MX`, or `CNAME`
    #[serde(rename = "type")]
    pub record_type: String,
    /// Host name
    pub host: String,
    /// Record value
    pub value: String,
    /// MX priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// Whether the platform has seen the record
    #[serde(default)]
    pub verified: bool,
}

/// A domain email is sent from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Domain ID
    pub id: String,
    /// Domain name
    pub domain: String,
    /// All checks passed
    #[serde(default)]
    pub verified: bool,
    /// DKIM record verified
    #[serde(default)]
    pub dkim_verified: bool,
    /// SPF record verified
    #[serde(default)]
    pub spf_verified: bool,
    /// DMARC record verified
    #[serde(default)]
    pub dmarc_verified: bool,
    /// Records to publish
    #[serde(default)]
    pub dns_records: Vec<DnsRecord>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Domain {
    /// Records not yet seen by the platform.
    pub fn pending_records(&self) -> impl Iterator<Item = &DnsRecord> {
        self.dns_records.iter().filter(|record| !record.verified)
    }
}

/// Request to add a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDomainRequest {
    /// Domain name
    pub domain: String,
}

impl CreateDomainRequest {
    /// Request for `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

/// Outcome of a DNS verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainVerification {
    /// Whether every record checked out
    pub verified: bool,
    /// Per-record status keyed by record name
    #[serde(default)]
    pub records: Map<String, Value>,
}
