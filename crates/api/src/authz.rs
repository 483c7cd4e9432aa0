//! Role gates shared by all route handlers.
//!
//! These cover the *role* tier only; the office tier goes through
//! `fxcrm_auth::scope` per resource. Keeping both behind helpers means no
//! route re-implements its own check.

use axum::http::StatusCode;

use fxcrm_auth::{Principal, Role};
use fxcrm_core::OfficeId;

use crate::app::errors;

pub fn require_role(principal: &Principal, role: Role) -> Result<(), axum::response::Response> {
    if principal.role == role {
        return Ok(());
    }
    Err(errors::json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        format!("only {}s can access this endpoint", role.as_str()),
    ))
}

pub fn require_admin(principal: &Principal) -> Result<(), axum::response::Response> {
    require_role(principal, Role::Admin)
}

pub fn require_agent(principal: &Principal) -> Result<(), axum::response::Response> {
    require_role(principal, Role::Agent)
}

/// Gate for creation paths: the acting agent's office becomes the owning
/// office of the new record, so a missing assignment is a client error, not
/// a scope denial.
pub fn require_agent_office(principal: &Principal) -> Result<OfficeId, axum::response::Response> {
    require_agent(principal)?;
    principal.office_id.ok_or_else(|| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "agent is not assigned to an exchange office",
        )
    })
}
