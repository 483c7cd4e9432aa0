use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fxcrm_clients::ClientId;
use fxcrm_core::{DomainError, DomainResult, OfficeId, OwnedByOffice};

use crate::Currency;

// ─────────────────────────────────────────────────────────────────────────────
// Transaction ID
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("TransactionId: {e}")))?;
        Ok(Self(uuid))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction
// ─────────────────────────────────────────────────────────────────────────────

fn validate_exchange(
    amount: f64,
    exchange_rate: f64,
    source: Currency,
    target: Currency,
) -> DomainResult<()> {
    if !(amount > 0.0) {
        return Err(DomainError::validation("amount must be positive"));
    }
    if !(exchange_rate > 0.0) {
        return Err(DomainError::validation("exchange rate must be positive"));
    }
    if source == target {
        return Err(DomainError::validation(
            "source and target currencies must be different",
        ));
    }
    Ok(())
}

/// Parameters for recording a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id: TransactionId,
    pub amount: f64,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub exchange_rate: f64,
    pub transaction_date: DateTime<Utc>,
    pub client_id: ClientId,
    pub office_id: OfficeId,
    pub created_at: DateTime<Utc>,
}

/// Full replacement of the mutable fields (admin correction flow).
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionUpdate {
    pub amount: f64,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub exchange_rate: f64,
    pub transaction_date: DateTime<Utc>,
}

/// A currency-exchange transaction.
///
/// # Invariants
/// - Owned by the office that recorded it (`office_id` immutable).
/// - Source and target currencies differ; amount and rate are positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: f64,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub exchange_rate: f64,
    pub transaction_date: DateTime<Utc>,
    pub client_id: ClientId,
    pub office_id: OfficeId,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn create(params: NewTransaction) -> DomainResult<Self> {
        validate_exchange(
            params.amount,
            params.exchange_rate,
            params.source_currency,
            params.target_currency,
        )?;
        Ok(Self {
            id: params.id,
            amount: params.amount,
            source_currency: params.source_currency,
            target_currency: params.target_currency,
            exchange_rate: params.exchange_rate,
            transaction_date: params.transaction_date,
            client_id: params.client_id,
            office_id: params.office_id,
            created_at: params.created_at,
        })
    }

    pub fn apply_update(&mut self, update: TransactionUpdate) -> DomainResult<()> {
        validate_exchange(
            update.amount,
            update.exchange_rate,
            update.source_currency,
            update.target_currency,
        )?;
        self.amount = update.amount;
        self.source_currency = update.source_currency;
        self.target_currency = update.target_currency;
        self.exchange_rate = update.exchange_rate;
        self.transaction_date = update.transaction_date;
        Ok(())
    }

    /// Amount the client received, in the target currency.
    pub fn converted_amount(&self) -> f64 {
        self.amount * self.exchange_rate
    }
}

impl OwnedByOffice for Transaction {
    fn owning_office(&self) -> Option<OfficeId> {
        Some(self.office_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn new_transaction() -> NewTransaction {
        NewTransaction {
            id: TransactionId::new(),
            amount: 1000.0,
            source_currency: Currency::Eur,
            target_currency: Currency::Mad,
            exchange_rate: 10.85,
            transaction_date: Utc::now(),
            client_id: ClientId::new(),
            office_id: OfficeId::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_valid_transaction() {
        let tx = Transaction::create(new_transaction()).unwrap();
        assert_eq!(tx.converted_amount(), 1000.0 * 10.85);
    }

    #[test]
    fn same_currency_pair_is_rejected() {
        let mut params = new_transaction();
        params.target_currency = Currency::Eur;
        let result = Transaction::create(params);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn non_positive_amount_or_rate_is_rejected() {
        let mut params = new_transaction();
        params.amount = 0.0;
        assert!(Transaction::create(params).is_err());

        let mut params = new_transaction();
        params.exchange_rate = -1.0;
        assert!(Transaction::create(params).is_err());
    }

    #[test]
    fn update_revalidates_the_pair() {
        let mut tx = Transaction::create(new_transaction()).unwrap();
        let result = tx.apply_update(TransactionUpdate {
            amount: 500.0,
            source_currency: Currency::Usd,
            target_currency: Currency::Usd,
            exchange_rate: 1.0,
            transaction_date: Utc::now(),
        });
        assert!(result.is_err());
        // Failed update leaves the record untouched.
        assert_eq!(tx.amount, 1000.0);
    }
}
