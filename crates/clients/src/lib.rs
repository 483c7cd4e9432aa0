//! `fxcrm-clients` — client records and their per-client histories.

pub mod client;
pub mod recommendation;
pub mod segment;

pub use client::{AcquisitionSource, Client, ClientId, ClientUpdate, Gender, NewClient};
pub use recommendation::{Recommendation, RecommendationId};
pub use segment::{SegmentEntry, SegmentEntryId};
