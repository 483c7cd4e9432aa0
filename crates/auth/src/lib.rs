//! `fxcrm-auth` — authentication and office-scoped authorization boundary.
//!
//! Everything that decides *who* a request is acting as and *which office's*
//! data it may touch lives here: token issuance/verification, per-request
//! principal resolution against the current credential store, the shared
//! scope-guard policy, and credential verification at login. The crate is
//! intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod login;
pub mod password;
pub mod principal;
pub mod resolver;
pub mod roles;
pub mod scope;
pub mod store;
pub mod token;
pub mod user;

pub use claims::TokenClaims;
pub use login::{AuthSession, Authenticator, LoginError};
pub use password::{hash_password, verify_password, PasswordError};
pub use principal::Principal;
pub use resolver::{bearer_token, PrincipalResolver, Unauthenticated};
pub use roles::Role;
pub use scope::{authorize, office_filter, Action, OfficeFilter, ScopeError};
pub use store::CredentialStore;
pub use token::{TokenCodec, TokenError, TOKEN_TTL_SECS};
pub use user::{normalize_email, NewUser, User, UserProfile};
