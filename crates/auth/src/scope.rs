//! The scope guard: one decision function for office tenancy.
//!
//! Every domain operation calls [`authorize`] once per resource access and
//! [`office_filter`] once per listing, instead of re-implementing the office
//! equality check at each call site.

use thiserror::Error;

use fxcrm_core::OfficeId;

use crate::Principal;

/// What the caller is about to do with the resource (recorded in deny logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    #[error("office mismatch")]
    OfficeMismatch,

    /// Inactive principals are rejected at resolution; this is the backstop.
    #[error("inactive principal")]
    InactivePrincipal,
}

/// Deny-by-default tenancy policy.
///
/// | role  | resource office vs. principal office | result |
/// |-------|--------------------------------------|--------|
/// | Admin | any                                  | allow  |
/// | Agent | equal                                | allow  |
/// | Agent | different, unset, or unresolvable    | deny   |
pub fn authorize(
    principal: &Principal,
    resource_office: Option<OfficeId>,
    action: Action,
) -> Result<(), ScopeError> {
    if !principal.status.is_active() {
        return Err(ScopeError::InactivePrincipal);
    }

    if principal.is_admin() {
        return Ok(());
    }

    let Some(resource_office) = resource_office else {
        // A scoped resource without an owning office is a data-integrity
        // condition, not business logic.
        tracing::warn!(
            user_id = %principal.user_id,
            ?action,
            "scope check against a resource with no owning office"
        );
        return Err(ScopeError::OfficeMismatch);
    };

    match principal.office_id {
        Some(own) if own == resource_office => Ok(()),
        _ => {
            tracing::debug!(user_id = %principal.user_id, ?action, "scope denied");
            Err(ScopeError::OfficeMismatch)
        }
    }
}

/// Listing pre-filter derived from the principal.
///
/// Agents' list queries are constrained to their office *at the store query*;
/// results are never filtered after the fact in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeFilter {
    /// Unfiltered query (admins).
    All,
    /// Constrained to a single office (agents).
    Office(OfficeId),
    /// Matches nothing (agent without an office assignment).
    Empty,
}

pub fn office_filter(principal: &Principal) -> OfficeFilter {
    if principal.is_admin() {
        return OfficeFilter::All;
    }
    match principal.office_id {
        Some(office_id) => OfficeFilter::Office(office_id),
        None => OfficeFilter::Empty,
    }
}

impl OfficeFilter {
    pub fn permits(&self, office: Option<OfficeId>) -> bool {
        match self {
            OfficeFilter::All => true,
            OfficeFilter::Office(own) => office == Some(*own),
            OfficeFilter::Empty => false,
        }
    }
}
