use fxcrm_core::{OfficeId, Status, UserId};

use crate::Role;

/// A fully resolved principal for authorization decisions.
///
/// Built per request from the *current* credential-store record (not from
/// token claims), immutable once resolved, and discarded when the request
/// completes. There is no server-side session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
    pub status: Status,
    pub office_id: Option<OfficeId>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }
}
