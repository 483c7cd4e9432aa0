use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fxcrm_core::{DomainError, DomainResult, UserId};

use crate::{CampaignId, Channel};

/// Unique identifier for a campaign action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(Uuid);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ActionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for recording a campaign action.
#[derive(Debug, Clone)]
pub struct NewAction {
    pub id: ActionId,
    pub title: String,
    pub channel: Channel,
    pub content: String,
    pub campaign_id: CampaignId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// One outbound action executed under a campaign.
///
/// Carries no office of its own; the owning office is derived via the
/// campaign before any scope check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignAction {
    pub id: ActionId,
    pub title: String,
    pub channel: Channel,
    pub content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub campaign_id: CampaignId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl CampaignAction {
    pub fn create(params: NewAction) -> DomainResult<Self> {
        let title = params.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        let content = params.content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }
        Ok(Self {
            id: params.id,
            title,
            channel: params.channel,
            content,
            sent_at: None,
            campaign_id: params.campaign_id,
            created_by: params.created_by,
            created_at: params.created_at,
        })
    }

    /// Mark the action as handed to the delivery collaborator.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.sent_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_empty_content() {
        let result = CampaignAction::create(NewAction {
            id: ActionId::new(),
            title: "Follow-up".to_string(),
            channel: Channel::Sms,
            content: "  ".to_string(),
            campaign_id: CampaignId::new(),
            created_by: UserId::new(),
            created_at: Utc::now(),
        });
        assert!(result.is_err());
    }
}
