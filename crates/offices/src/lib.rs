//! `fxcrm-offices` — exchange office records (the tenancy boundary).

pub mod office;

pub use office::{ExchangeOffice, NewOffice, OfficeSummary, OfficeUpdate};
