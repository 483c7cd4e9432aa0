//! Credential verification at login.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{normalize_email, password, CredentialStore, TokenCodec, UserProfile};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Correct password, deactivated account. Only reachable *after* the
    /// password verified, so disablement never leaks to a guessing attacker.
    #[error("account disabled")]
    AccountDisabled,

    #[error("token issuance failed")]
    TokenIssuance,
}

/// Result of a successful login: a bearer token plus the public projection of
/// the user it was issued to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Verifies credentials and mints tokens.
pub struct Authenticator<S> {
    codec: TokenCodec,
    store: S,
}

impl<S> Authenticator<S>
where
    S: CredentialStore,
{
    pub fn new(codec: TokenCodec, store: S) -> Self {
        Self { codec, store }
    }

    pub fn authenticate(
        &self,
        email: &str,
        password_plain: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthSession, LoginError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email) else {
            return Err(LoginError::InvalidCredentials);
        };

        if !password::verify_password(password_plain, &user.password_hash) {
            return Err(LoginError::InvalidCredentials);
        }

        // Status is checked only after the secret verified.
        if !user.status.is_active() {
            return Err(LoginError::AccountDisabled);
        }

        let token = self
            .codec
            .issue(user.id, user.role, now)
            .map_err(|_| LoginError::TokenIssuance)?;

        Ok(AuthSession {
            token,
            expires_in: self.codec.ttl().num_seconds(),
            user: user.profile(),
        })
    }
}
