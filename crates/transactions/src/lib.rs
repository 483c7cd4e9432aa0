//! `fxcrm-transactions` — currency-exchange transactions.

pub mod currency;
pub mod transaction;

pub use currency::Currency;
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionUpdate};
