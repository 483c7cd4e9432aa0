//! Password hashing and verification (bcrypt).

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash,
}

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(|_| PasswordError::Hash)
}

/// Verify a candidate against a stored hash.
///
/// A malformed stored hash counts as a mismatch; the caller must not be able
/// to distinguish "bad hash" from "wrong password".
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}
