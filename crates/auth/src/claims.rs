use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use fxcrm_core::UserId;

use crate::Role;

/// Signed claim set carried by a bearer token.
///
/// The token proves *identity* only: `role` is embedded for inspection but is
/// never trusted for authorization decisions. The resolver re-reads the
/// current credential-store record on every request, so demotions and
/// deactivations take effect without waiting for expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user this token was issued to.
    pub sub: UserId,

    /// Role at issuance time (informational, see above).
    pub role: Role,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(sub: UserId, role: Role, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
