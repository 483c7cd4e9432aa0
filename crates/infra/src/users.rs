use std::collections::HashMap;
use std::sync::RwLock;

use fxcrm_auth::{CredentialStore, OfficeFilter, User};
use fxcrm_core::{OwnedByOffice, UserId};

/// In-memory user directory; the credential store behind the resolver and
/// the login flow.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, user: User) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(user.id, user);
        }
    }

    pub fn remove(&self, id: &UserId) -> Option<User> {
        let mut map = self.inner.write().ok()?;
        map.remove(id)
    }

    /// Office-constrained listing, same contract as the entity stores.
    pub fn list_in_scope(&self, filter: &OfficeFilter) -> Vec<User> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values()
            .filter(|u| filter.permits(u.owning_office()))
            .cloned()
            .collect()
    }

    pub fn email_taken(&self, email: &str, excluding: Option<UserId>) -> bool {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return false,
        };
        map.values()
            .any(|u| Some(u.id) != excluding && u.email.eq_ignore_ascii_case(email))
    }
}

impl CredentialStore for InMemoryUserDirectory {
    fn find_by_id(&self, id: UserId) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned()
    }
}
