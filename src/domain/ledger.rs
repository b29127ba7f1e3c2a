use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, TransactionFields, TransactionId, TransactionRecord, ValidationError};

/// Compute the net amount from a list of records.
/// Net = sum of credits - sum of debits, saturating at the bounds of `Cents`.
pub fn compute_net_amount(transactions: &[TransactionRecord]) -> Cents {
    let total: i128 = transactions
        .iter()
        .map(|t| i128::from(t.signed_amount()))
        .sum();
    total.clamp(i128::from(Cents::MIN), i128::from(Cents::MAX)) as Cents
}

/// The singleton ledger document: every transaction plus the running net amount.
///
/// `net_amount_spent` is maintained incrementally and can only change through
/// [`LedgerState::insert`], [`LedgerState::replace`] and [`LedgerState::remove`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    transactions: Vec<TransactionRecord>,
    net_amount_spent: Cents,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            transactions: Vec::new(),
            net_amount_spent: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records in insertion order.
    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<TransactionRecord> {
        self.transactions
    }

    pub fn net_amount_spent(&self) -> Cents {
        self.net_amount_spent
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: TransactionId) -> Option<&TransactionRecord> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Append a record and apply its contribution to the net amount.
    /// Nothing changes if the net amount would leave the range of `Cents`.
    pub fn insert(
        &mut self,
        record: TransactionRecord,
    ) -> Result<&TransactionRecord, ValidationError> {
        let net_amount_spent = self
            .net_amount_spent
            .checked_add(record.signed_amount())
            .ok_or(ValidationError::NetAmountOverflow)?;

        self.net_amount_spent = net_amount_spent;
        self.transactions.push(record);
        self.touch();
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Overwrite the fields of an existing record.
    ///
    /// The old contribution is reversed using the old type and amount before
    /// the new contribution is applied, so a type change is handled correctly.
    /// Returns `Ok(None)` for an unknown id.
    pub fn replace(
        &mut self,
        id: TransactionId,
        fields: TransactionFields,
    ) -> Result<Option<&TransactionRecord>, ValidationError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let net_amount_spent = self
            .net_amount_spent
            .checked_sub(self.transactions[index].signed_amount())
            .and_then(|net| {
                net.checked_add(fields.transaction_type.signed(fields.amount_cents))
            })
            .ok_or(ValidationError::NetAmountOverflow)?;

        self.transactions[index].overwrite(fields);
        self.net_amount_spent = net_amount_spent;
        self.touch();
        Ok(Some(&self.transactions[index]))
    }

    /// Remove a record and reverse its contribution.
    /// An emptied ledger has its net amount reset to exactly zero.
    /// Returns `Ok(None)` for an unknown id.
    pub fn remove(
        &mut self,
        id: TransactionId,
    ) -> Result<Option<TransactionRecord>, ValidationError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let net_amount_spent = if self.transactions.len() == 1 {
            0
        } else {
            self.net_amount_spent
                .checked_sub(self.transactions[index].signed_amount())
                .ok_or(ValidationError::NetAmountOverflow)?
        };

        let record = self.transactions.remove(index);
        self.net_amount_spent = net_amount_spent;
        self.touch();
        Ok(Some(record))
    }

    /// Stored net amount minus the net amount recomputed from the records.
    /// Zero for any ledger that was only changed through this type.
    pub fn drift(&self) -> Cents {
        self.net_amount_spent
            .saturating_sub(compute_net_amount(&self.transactions))
    }

    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
