use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fxcrm_core::{DomainError, DomainResult, OfficeId, OwnedByOffice, Status};

// ─────────────────────────────────────────────────────────────────────────────
// Client ID
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
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

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ClientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("ClientId: {e}")))?;
        Ok(Self(uuid))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// How the client first reached the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionSource {
    Online,
    WalkIn,
    Referral,
    PhoneCall,
    Email,
    SocialMedia,
    Advertising,
    Partnership,
    AgentDirect,
    Other,
}

impl AcquisitionSource {
    pub const ALL: [AcquisitionSource; 10] = [
        AcquisitionSource::Online,
        AcquisitionSource::WalkIn,
        AcquisitionSource::Referral,
        AcquisitionSource::PhoneCall,
        AcquisitionSource::Email,
        AcquisitionSource::SocialMedia,
        AcquisitionSource::Advertising,
        AcquisitionSource::Partnership,
        AcquisitionSource::AgentDirect,
        AcquisitionSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionSource::Online => "online",
            AcquisitionSource::WalkIn => "walk_in",
            AcquisitionSource::Referral => "referral",
            AcquisitionSource::PhoneCall => "phone_call",
            AcquisitionSource::Email => "email",
            AcquisitionSource::SocialMedia => "social_media",
            AcquisitionSource::Advertising => "advertising",
            AcquisitionSource::Partnership => "partnership",
            AcquisitionSource::AgentDirect => "agent_direct",
            AcquisitionSource::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionSource::Online => "Online",
            AcquisitionSource::WalkIn => "Walk-in",
            AcquisitionSource::Referral => "Referral",
            AcquisitionSource::PhoneCall => "Phone Call",
            AcquisitionSource::Email => "Email",
            AcquisitionSource::SocialMedia => "Social Media",
            AcquisitionSource::Advertising => "Advertising",
            AcquisitionSource::Partnership => "Partnership",
            AcquisitionSource::AgentDirect => "Direct Agent",
            AcquisitionSource::Other => "Other",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

fn validate_name(value: &str, field: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn validate_optional_email(email: Option<String>) -> DomainResult<Option<String>> {
    match email {
        None => Ok(None),
        Some(email) => {
            let email = email.trim().to_lowercase();
            if email.is_empty() {
                return Ok(None);
            }
            if !email.contains('@') {
                return Err(DomainError::validation("invalid email format"));
            }
            Ok(Some(email))
        }
    }
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parameters for registering a client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub national_id: Option<String>,
    pub passport: Option<String>,
    pub nationality: String,
    pub residence: Option<String>,
    pub gender: Gender,
    pub acquisition_source: AcquisitionSource,
    pub segment: Option<String>,
    pub office_id: OfficeId,
    pub created_at: DateTime<Utc>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub national_id: Option<String>,
    pub passport: Option<String>,
    pub nationality: Option<String>,
    pub residence: Option<String>,
    pub gender: Option<Gender>,
    pub acquisition_source: Option<AcquisitionSource>,
    pub segment: Option<String>,
}

/// A client of an exchange office.
///
/// # Invariants
/// - A client belongs to exactly one office; `office_id` is immutable after
///   creation.
/// - Passport and national-id numbers are unique within an office (enforced
///   by the write paths against the store).
/// - Deletion is a soft status flip so transaction history stays intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub national_id: Option<String>,
    pub passport: Option<String>,
    pub nationality: String,
    pub residence: Option<String>,
    pub gender: Gender,
    pub acquisition_source: AcquisitionSource,
    pub segment: Option<String>,
    pub status: Status,
    pub office_id: OfficeId,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn create(params: NewClient) -> DomainResult<Self> {
        Ok(Self {
            id: params.id,
            first_name: validate_name(&params.first_name, "first name")?,
            last_name: validate_name(&params.last_name, "last name")?,
            birth_date: params.birth_date,
            email: validate_optional_email(params.email)?,
            phone: trim_optional(params.phone),
            whatsapp: trim_optional(params.whatsapp),
            national_id: trim_optional(params.national_id),
            passport: trim_optional(params.passport),
            nationality: validate_name(&params.nationality, "nationality")?,
            residence: trim_optional(params.residence),
            gender: params.gender,
            acquisition_source: params.acquisition_source,
            segment: trim_optional(params.segment),
            status: Status::Active,
            office_id: params.office_id,
            created_at: params.created_at,
        })
    }

    /// Apply an update. Returns the new segment when it actually changed, so
    /// the caller can record a history entry.
    pub fn apply_update(&mut self, update: ClientUpdate) -> DomainResult<Option<String>> {
        if let Some(first_name) = update.first_name {
            self.first_name = validate_name(&first_name, "first name")?;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = validate_name(&last_name, "last name")?;
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = Some(birth_date);
        }
        if update.email.is_some() {
            self.email = validate_optional_email(update.email)?;
        }
        if update.phone.is_some() {
            self.phone = trim_optional(update.phone);
        }
        if update.whatsapp.is_some() {
            self.whatsapp = trim_optional(update.whatsapp);
        }
        if update.national_id.is_some() {
            self.national_id = trim_optional(update.national_id);
        }
        if update.passport.is_some() {
            self.passport = trim_optional(update.passport);
        }
        if let Some(nationality) = update.nationality {
            self.nationality = validate_name(&nationality, "nationality")?;
        }
        if update.residence.is_some() {
            self.residence = trim_optional(update.residence);
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(acquisition_source) = update.acquisition_source {
            self.acquisition_source = acquisition_source;
        }

        let mut changed_segment = None;
        if update.segment.is_some() {
            let segment = trim_optional(update.segment);
            if segment != self.segment {
                changed_segment = segment.clone();
                self.segment = segment;
            }
        }
        Ok(changed_segment)
    }

    /// Soft delete: the record is retained for history.
    pub fn deactivate(&mut self) {
        self.status = Status::Inactive;
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl OwnedByOffice for Client {
    fn owning_office(&self) -> Option<OfficeId> {
        Some(self.office_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
