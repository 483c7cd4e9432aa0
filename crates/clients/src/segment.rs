//! Segment history: one entry per segment change of a client.
//!
//! Entries carry no office of their own; their owning office is derived via
//! the client before any scope check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ClientId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentEntryId(Uuid);

impl SegmentEntryId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SegmentEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SegmentEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentEntry {
    pub id: SegmentEntryId,
    pub client_id: ClientId,
    pub segment: String,
    pub created_at: DateTime<Utc>,
}

impl SegmentEntry {
    pub fn record(client_id: ClientId, segment: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SegmentEntryId::new(),
            client_id,
            segment: segment.into(),
            created_at: now,
        }
    }
}
