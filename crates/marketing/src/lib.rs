//! `fxcrm-marketing` — campaigns, campaign actions, and quick messages.

pub mod action;
pub mod campaign;
pub mod channel;
pub mod quick_message;

pub use action::{ActionId, CampaignAction, NewAction};
pub use campaign::{Campaign, CampaignId, CampaignStatus, NewCampaign};
pub use channel::Channel;
pub use quick_message::{NewQuickMessage, QuickMessage, QuickMessageId};
