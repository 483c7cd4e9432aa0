//! Recommendations produced for a client by the analytics pipeline.
//!
//! Write access is external (the pipeline inserts directly); the API only
//! reads these, scoped through the owning client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ClientId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationId(Uuid);

impl RecommendationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecommendationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub id: RecommendationId,
    pub client_id: ClientId,
    pub recommendation_type: String,
    pub description: String,
    pub status: String,
    pub generated_at: DateTime<Utc>,
}
