//! `fxcrm-infra` — storage backends.
//!
//! The stores provide single-operation atomicity (one `RwLock` acquisition
//! per call) and nothing more; authorization is enforced entirely at the
//! application layer, with the office pre-filter pushed into the `list` query
//! here so agents' listings are constrained before results materialize.

pub mod store;
pub mod users;

pub use store::InMemoryStore;
pub use users::InMemoryUserDirectory;
