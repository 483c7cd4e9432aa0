//! Per-request principal resolution.

use thiserror::Error;

use crate::{CredentialStore, Principal, TokenCodec};

/// Definitive authentication failure: the request carries no valid identity.
///
/// Missing/malformed header, bad signature, expiry, unknown user, and
/// deactivated user all collapse into this one outcome; callers answer 401
/// without learning which condition fired.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unauthenticated")]
pub struct Unauthenticated;

/// Extract the token from an `Authorization` header value.
///
/// Only the `Bearer <token>` shape is accepted.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Turns an inbound `Authorization` header into a verified [`Principal`].
///
/// The token proves identity only; role, status, and office are re-read from
/// the credential store on every call, so a demoted or deactivated user with
/// a still-unexpired token is rejected immediately. Nothing is cached across
/// requests (consistency over latency).
pub struct PrincipalResolver<S> {
    codec: TokenCodec,
    store: S,
}

impl<S> PrincipalResolver<S>
where
    S: CredentialStore,
{
    pub fn new(codec: TokenCodec, store: S) -> Self {
        Self { codec, store }
    }

    pub fn resolve(&self, authorization: Option<&str>) -> Result<Principal, Unauthenticated> {
        let header = authorization.ok_or(Unauthenticated)?;
        let token = bearer_token(header).ok_or(Unauthenticated)?;
        let claims = self.codec.verify(token).map_err(|_| Unauthenticated)?;

        // Source of truth for current rights is the store record, not the
        // token payload.
        let user = self.store.find_by_id(claims.sub).ok_or(Unauthenticated)?;
        if !user.status.is_active() {
            return Err(Unauthenticated);
        }

        Ok(user.principal())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use chrono::Utc;
    use fxcrm_core::{OfficeId, Status, UserId};

    use super::*;
    use crate::{NewUser, Role, User};

    struct MemStore {
        inner: RwLock<HashMap<UserId, User>>,
    }

    impl MemStore {
        fn with(users: Vec<User>) -> Self {
            Self {
                inner: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
            }
        }

        fn update(&self, user: User) {
            self.inner.write().unwrap().insert(user.id, user);
        }
    }

    impl CredentialStore for MemStore {
        fn find_by_id(&self, id: UserId) -> Option<User> {
            self.inner.read().unwrap().get(&id).cloned()
        }

        fn find_by_email(&self, email: &str) -> Option<User> {
            self.inner
                .read()
                .unwrap()
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned()
        }
    }

    fn agent(office_id: OfficeId) -> User {
        User::create(NewUser {
            id: UserId::new(),
            email: "agent@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            first_name: "Agent".to_string(),
            last_name: "One".to_string(),
            phone: String::new(),
            role: Role::Agent,
            office_id: Some(office_id),
            created_at: Utc::now(),
        })
        .unwrap()
    }

    #[test]
    fn resolves_active_user_from_current_record() {
        let office_id = OfficeId::new();
        let user = agent(office_id);
        let codec = TokenCodec::new(b"test-secret");
        let token = codec.issue(user.id, user.role, Utc::now()).unwrap();
        let resolver = PrincipalResolver::new(codec, MemStore::with(vec![user.clone()]));

        let principal = resolver.resolve(Some(&format!("Bearer {token}"))).unwrap();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.role, Role::Agent);
        assert_eq!(principal.office_id, Some(office_id));
    }

    #[test]
    fn header_shape_is_strict() {
        let user = agent(OfficeId::new());
        let codec = TokenCodec::new(b"test-secret");
        let token = codec.issue(user.id, user.role, Utc::now()).unwrap();
        let resolver = PrincipalResolver::new(codec, MemStore::with(vec![user]));

        assert_eq!(resolver.resolve(None), Err(Unauthenticated));
        assert_eq!(resolver.resolve(Some(&token)), Err(Unauthenticated));
        assert_eq!(resolver.resolve(Some(&format!("Basic {token}"))), Err(Unauthenticated));
        assert_eq!(resolver.resolve(Some("Bearer ")), Err(Unauthenticated));
        assert_eq!(resolver.resolve(Some(&format!("bearer {token}"))), Err(Unauthenticated));
    }

    #[test]
    fn unknown_user_is_unauthenticated() {
        let codec = TokenCodec::new(b"test-secret");
        let token = codec.issue(UserId::new(), Role::Admin, Utc::now()).unwrap();
        let resolver = PrincipalResolver::new(codec, MemStore::with(vec![]));

        assert_eq!(resolver.resolve(Some(&format!("Bearer {token}"))), Err(Unauthenticated));
    }

    #[test]
    fn deactivation_invalidates_a_live_token() {
        let user = agent(OfficeId::new());
        let codec = TokenCodec::new(b"test-secret");
        let token = codec.issue(user.id, user.role, Utc::now()).unwrap();
        let store = MemStore::with(vec![user.clone()]);
        let header = format!("Bearer {token}");

        let resolver = PrincipalResolver::new(codec, store);
        assert!(resolver.resolve(Some(&header)).is_ok());

        let mut deactivated = user;
        deactivated.set_status(Status::Inactive);
        resolver.store.update(deactivated);

        // Same token, previously valid: rejected on the very next request.
        assert_eq!(resolver.resolve(Some(&header)), Err(Unauthenticated));
    }

    #[test]
    fn stale_token_role_is_ignored_in_favor_of_the_store() {
        let office_id = OfficeId::new();
        let user = agent(office_id);
        let codec = TokenCodec::new(b"test-secret");
        // Token claims admin; the store says agent. The store wins.
        let token = codec.issue(user.id, Role::Admin, Utc::now()).unwrap();
        let resolver = PrincipalResolver::new(codec, MemStore::with(vec![user]));

        let principal = resolver.resolve(Some(&format!("Bearer {token}"))).unwrap();
        assert_eq!(principal.role, Role::Agent);
        assert_eq!(principal.office_id, Some(office_id));
    }
}
