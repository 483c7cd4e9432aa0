//! User record: identity, credential, role, status, office assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fxcrm_core::{DomainError, DomainResult, OfficeId, OwnedByOffice, Status, UserId};

use crate::{Principal, Role};

/// Normalize an email address for storage and lookup: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> DomainResult<String> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

fn validate_name(value: &str, field: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub office_id: Option<OfficeId>,
    pub created_at: DateTime<Utc>,
}

/// A user of the system.
///
/// # Invariants
/// - Agents are assigned to exactly one exchange office; admins carry none.
/// - The office assignment is set at creation and immutable thereafter.
/// - `password_hash` never leaves this crate in a response projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub status: Status,
    pub office_id: Option<OfficeId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn create(params: NewUser) -> DomainResult<Self> {
        let email = validate_email(&params.email)?;
        let first_name = validate_name(&params.first_name, "first name")?;
        let last_name = validate_name(&params.last_name, "last name")?;

        match (params.role, params.office_id) {
            (Role::Agent, None) => {
                return Err(DomainError::validation(
                    "an agent must be assigned to an exchange office",
                ));
            }
            (Role::Admin, Some(_)) => {
                return Err(DomainError::validation(
                    "an administrator is not assigned to an exchange office",
                ));
            }
            _ => {}
        }

        Ok(Self {
            id: params.id,
            email,
            password_hash: params.password_hash,
            first_name,
            last_name,
            phone: params.phone.trim().to_string(),
            role: params.role,
            status: Status::Active,
            office_id: params.office_id,
            created_at: params.created_at,
        })
    }

    /// Apply an identity update; `None` fields are left untouched.
    pub fn update_identity(
        &mut self,
        email: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone: Option<&str>,
    ) -> DomainResult<()> {
        if let Some(email) = email {
            self.email = validate_email(email)?;
        }
        if let Some(first_name) = first_name {
            self.first_name = validate_name(first_name, "first name")?;
        }
        if let Some(last_name) = last_name {
            self.last_name = validate_name(last_name, "last name")?;
        }
        if let Some(phone) = phone {
            self.phone = phone.trim().to_string();
        }
        Ok(())
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }

    /// The principal this record currently authorizes.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            role: self.role,
            status: self.status,
            office_id: self.office_id,
        }
    }

    /// Public projection; never carries the credential hash.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            role: self.role,
            status: self.status,
            office_id: self.office_id,
            created_at: self.created_at,
        }
    }
}

impl OwnedByOffice for User {
    fn owning_office(&self) -> Option<OfficeId> {
        self.office_id
    }
}

/// Public projection of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub status: Status,
    pub office_id: Option<OfficeId>,
    pub created_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
