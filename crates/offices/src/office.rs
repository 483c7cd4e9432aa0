use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fxcrm_core::{DomainError, DomainResult, OfficeId, Status};

fn validate_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

fn validate_required(value: &str, field: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Parameters for creating an exchange office.
#[derive(Debug, Clone)]
pub struct NewOffice {
    pub id: OfficeId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficeUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub owner: Option<String>,
    pub status: Option<Status>,
}

impl OfficeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.owner.is_none()
            && self.status.is_none()
    }
}

/// An exchange office.
///
/// Offices are the tenancy boundary: every scoped record in the system is
/// owned by exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOffice {
    pub id: OfficeId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub owner: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl ExchangeOffice {
    pub fn create(params: NewOffice) -> DomainResult<Self> {
        Ok(Self {
            id: params.id,
            name: validate_required(&params.name, "name")?,
            address: params.address.trim().to_string(),
            email: validate_email(&params.email)?,
            phone: params.phone.trim().to_string(),
            owner: validate_required(&params.owner, "owner")?,
            status: Status::Active,
            created_at: params.created_at,
        })
    }

    pub fn apply_update(&mut self, update: OfficeUpdate) -> DomainResult<()> {
        if update.is_empty() {
            return Err(DomainError::validation(
                "at least one field must be provided for update",
            ));
        }
        if let Some(name) = update.name {
            self.name = validate_required(&name, "name")?;
        }
        if let Some(address) = update.address {
            self.address = address.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = validate_email(&email)?;
        }
        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(owner) = update.owner {
            self.owner = validate_required(&owner, "owner")?;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn summary(&self) -> OfficeSummary {
        OfficeSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Compact projection used wherever a user or listing references its office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeSummary {
    pub id: OfficeId,
    pub name: String,
}
