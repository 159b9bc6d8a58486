//! Campaign types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Being edited
    Draft,
    /// Submitted, waiting for review
    PendingApproval,
    /// Cleared for sending
    Approved,
    /// Sent back by a reviewer
    Rejected,
    /// Will send at `scheduled_for`
    Scheduled,
    /// Sending in progress
    Sending,
    /// Finished
    Sent,
    /// Sending paused
    Paused,
    /// A state this client does not know
    #[serde(other)]
    Unknown,
}

/// A bulk email campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Campaign ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Lifecycle state
    pub status: CampaignStatus,
    /// Template rendered for each recipient
    #[serde(default)]
    pub template_id: Option<String>,
    /// Scheduled send time
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// When sending finished
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    /// Recipients targeted
    #[serde(default)]
    pub recipient_count: u64,
    /// Recipients delivered to
    #[serde(default)]
    pub delivered_count: u64,
    /// Recipients who opened
    #[serde(default)]
    pub opened_count: u64,
    /// Recipients who clicked
    #[serde(default)]
    pub clicked_count: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Request to create a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    /// Display name
    pub name: String,
    /// Template to send
    pub template_id: String,
    /// Contact list to send to
    pub contact_list_id: String,
    /// Send time; omit to send on demand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Partial update of a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Send time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Lifecycle state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
}

/// Filters for listing campaigns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsParams {
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only campaigns in this state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    /// Only campaigns with this review state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,
    /// Match against the campaign name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(CampaignStatus::PendingApproval).unwrap(),
            json!("pending_approval")
        );
        let status: CampaignStatus = serde_json::from_value(json!("archived")).unwrap();
        assert_eq!(status, CampaignStatus::Unknown);
    }

    #[test]
    fn test_campaign_deserialization() {
        let campaign: Campaign = serde_json::from_value(json!({
            "id": "cmp_1",
            "name": "Spring sale",
            "status": "scheduled",
            "templateId": "tpl_1",
            "scheduledFor": "2025-04-01T09:00:00Z",
            "recipientCount": 1200,
            "createdAt": "2025-03-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(campaign.status, CampaignStatus::Scheduled);
        assert_eq!(campaign.recipient_count, 1200);
        assert_eq!(campaign.opened_count, 0);
    }
}
