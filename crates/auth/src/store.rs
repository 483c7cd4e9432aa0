use std::sync::Arc;

use fxcrm_core::UserId;

use crate::User;

/// Source of truth for user identity, credentials, role, status, and office
/// assignment.
///
/// The resolver re-reads this on every request; implementations must return
/// the current record, never a cached one.
pub trait CredentialStore: Send + Sync {
    fn find_by_id(&self, id: UserId) -> Option<User>;

    /// Case-insensitive email lookup; callers pass a normalized address but
    /// the match itself must not depend on stored casing.
    fn find_by_email(&self, email: &str) -> Option<User>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_by_id(&self, id: UserId) -> Option<User> {
        (**self).find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        (**self).find_by_email(email)
    }
}
