use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fxcrm_clients::ClientId;
use fxcrm_core::{DomainError, DomainResult, OfficeId, OwnedByOffice, UserId};

use crate::Channel;

/// Unique identifier for a quick message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuickMessageId(Uuid);

impl QuickMessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QuickMessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for QuickMessageId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuickMessageId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("QuickMessageId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Parameters for sending a quick message.
#[derive(Debug, Clone)]
pub struct NewQuickMessage {
    pub id: QuickMessageId,
    pub title: String,
    pub channel: Channel,
    pub content: String,
    pub office_id: OfficeId,
    pub created_by: UserId,
    pub target_clients: Vec<ClientId>,
    pub created_at: DateTime<Utc>,
}

/// An ad-hoc message to a set of clients, outside any campaign.
///
/// # Invariants
/// - Owned by the office of the sending agent (`office_id` immutable).
/// - Targets at least one client; all targets belong to the owning office
///   (the write path verifies membership against the client store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickMessage {
    pub id: QuickMessageId,
    pub title: String,
    pub channel: Channel,
    pub content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub office_id: OfficeId,
    pub created_by: UserId,
    pub target_clients: Vec<ClientId>,
    pub created_at: DateTime<Utc>,
}

impl QuickMessage {
    pub fn create(params: NewQuickMessage) -> DomainResult<Self> {
        let title = params.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        let content = params.content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }
        if params.target_clients.is_empty() {
            return Err(DomainError::validation("at least one target client is required"));
        }

        let mut target_clients = Vec::new();
        for client_id in params.target_clients {
            if !target_clients.contains(&client_id) {
                target_clients.push(client_id);
            }
        }

        Ok(Self {
            id: params.id,
            title,
            channel: params.channel,
            content,
            sent_at: None,
            office_id: params.office_id,
            created_by: params.created_by,
            target_clients,
            created_at: params.created_at,
        })
    }

    /// Mark the message as handed to the delivery collaborator.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.sent_at = Some(at);
    }
}

impl OwnedByOffice for QuickMessage {
    fn owning_office(&self) -> Option<OfficeId> {
        Some(self.office_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(targets: Vec<ClientId>) -> NewQuickMessage {
        NewQuickMessage {
            id: QuickMessageId::new(),
            title: "Rate alert".to_string(),
            channel: Channel::Whatsapp,
            content: "EUR->MAD at 10.9 today".to_string(),
            office_id: OfficeId::new(),
            created_by: UserId::new(),
            target_clients: targets,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_requires_targets() {
        let result = QuickMessage::create(new_message(vec![]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_dedupes_targets_and_starts_unsent() {
        let client = ClientId::new();
        let message = QuickMessage::create(new_message(vec![client, client])).unwrap();
        assert_eq!(message.target_clients, vec![client]);
        assert_eq!(message.sent_at, None);
    }
}
