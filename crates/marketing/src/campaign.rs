use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fxcrm_clients::ClientId;
use fxcrm_core::{DomainError, DomainResult, OfficeId, OwnedByOffice, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Campaign ID
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a marketing campaign.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(Uuid);

impl CampaignId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CampaignId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("CampaignId: {e}")))?;
        Ok(Self(uuid))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Campaign status
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Draft,
        CampaignStatus::Active,
        CampaignStatus::Completed,
        CampaignStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "Draft",
            CampaignStatus::Active => "Active",
            CampaignStatus::Completed => "Completed",
            CampaignStatus::Cancelled => "Cancelled",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Campaign
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for creating a campaign.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub office_id: OfficeId,
    pub created_by: UserId,
    pub target_clients: Vec<ClientId>,
    pub created_at: DateTime<Utc>,
}

/// A marketing campaign targeting clients of one office.
///
/// # Invariants
/// - Owned by the office of the agent that created it (`office_id` immutable).
/// - `end_date` is strictly after `start_date`.
/// - Target clients are deduplicated and always belong to the owning office
///   (the write paths verify membership against the client store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub status: CampaignStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub office_id: OfficeId,
    pub created_by: UserId,
    pub target_clients: Vec<ClientId>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn create(params: NewCampaign) -> DomainResult<Self> {
        let title = params.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if params.end_date <= params.start_date {
            return Err(DomainError::validation("end date must be after start date"));
        }

        let mut campaign = Self {
            id: params.id,
            title,
            description: params.description.trim().to_string(),
            status: CampaignStatus::Draft,
            start_date: params.start_date,
            end_date: params.end_date,
            office_id: params.office_id,
            created_by: params.created_by,
            target_clients: Vec::new(),
            created_at: params.created_at,
        };
        campaign.add_targets(params.target_clients);
        Ok(campaign)
    }

    pub fn set_status(&mut self, status: CampaignStatus) {
        self.status = status;
    }

    /// Add target clients, skipping any already present.
    pub fn add_targets(&mut self, client_ids: Vec<ClientId>) {
        for client_id in client_ids {
            if !self.target_clients.contains(&client_id) {
                self.target_clients.push(client_id);
            }
        }
    }

    /// Remove target clients; unknown ids are ignored.
    pub fn remove_targets(&mut self, client_ids: &[ClientId]) {
        self.target_clients.retain(|id| !client_ids.contains(id));
    }
}

impl OwnedByOffice for Campaign {
    fn owning_office(&self) -> Option<OfficeId> {
        Some(self.office_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
