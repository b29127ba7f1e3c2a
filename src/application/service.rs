use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{
    Cents, LedgerState, TransactionId, TransactionInput, TransactionRecord, compute_net_amount,
};
use crate::storage::{LedgerStore, Repository};

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every operation re-loads the ledger from the store; nothing is cached
/// between calls. Mutations run one at a time per service instance.
pub struct LedgerService<S = Repository> {
    store: S,
    write_lock: Mutex<()>,
}

/// Result of creating or updating a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub transaction: TransactionRecord,
    pub net_amount_spent: Cents,
}

/// Every transaction in insertion order with the running net amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionList {
    pub transactions: Vec<TransactionRecord>,
    pub net_amount_spent: Cents,
}

impl TransactionList {
    fn empty() -> Self {
        Self {
            transactions: Vec::new(),
            net_amount_spent: 0,
        }
    }
}

/// Comparison of the stored net amount with one recomputed from the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub transaction_count: usize,
    pub net_amount_spent: Cents,
    pub recomputed_net_amount: Cents,
    pub drift: Cents,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.drift == 0
    }
}

impl LedgerService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }
}

impl<S: LedgerStore> LedgerService<S> {
    /// Create a new ledger service on top of the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load(&self) -> Result<Option<LedgerState>, AppError> {
        Ok(self.store.load_ledger().await?)
    }

    async fn save(&self, ledger: &LedgerState) -> Result<(), AppError> {
        Ok(self.store.save_ledger(ledger).await?)
    }

    async fn load_existing(&self, id: TransactionId) -> Result<LedgerState, AppError> {
        match self.load().await? {
            Some(ledger) if ledger.get(id).is_some() => Ok(ledger),
            _ => {
                tracing::warn!(%id, "transaction not found");
                Err(AppError::TransactionNotFound(id))
            }
        }
    }

    /// Record a new transaction, creating the ledger on first use.
    pub async fn create_transaction(
        &self,
        input: TransactionInput,
    ) -> Result<TransactionResult, AppError> {
        let fields = input.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut ledger = match self.load().await? {
            Some(ledger) => ledger,
            None => {
                tracing::info!("initializing new ledger document");
                LedgerState::new()
            }
        };

        let transaction = ledger.insert(TransactionRecord::new(fields))?.clone();
        self.save(&ledger).await?;

        tracing::info!(
            id = %transaction.id,
            amount_cents = transaction.amount_cents,
            transaction_type = %transaction.transaction_type,
            net_amount_spent = ledger.net_amount_spent(),
            "transaction added"
        );

        Ok(TransactionResult {
            transaction,
            net_amount_spent: ledger.net_amount_spent(),
        })
    }

    /// List every transaction in insertion order with the net amount.
    /// An absent or empty ledger yields an empty list and a net amount of zero.
    pub async fn list_transactions(&self) -> Result<TransactionList, AppError> {
        match self.load().await? {
            Some(ledger) if !ledger.is_empty() => {
                let net_amount_spent = ledger.net_amount_spent();
                Ok(TransactionList {
                    transactions: ledger.into_transactions(),
                    net_amount_spent,
                })
            }
            _ => Ok(TransactionList::empty()),
        }
    }

    /// Get a single transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<TransactionRecord, AppError> {
        let ledger = self.load_existing(id).await?;
        ledger
            .get(id)
            .cloned()
            .ok_or(AppError::TransactionNotFound(id))
    }

    /// Overwrite a transaction, moving the net amount from its old values to the new ones.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<TransactionResult, AppError> {
        let fields = input.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut ledger = self.load_existing(id).await?;

        let previous_net = ledger.net_amount_spent();
        let transaction = ledger
            .replace(id, fields)?
            .cloned()
            .ok_or(AppError::TransactionNotFound(id))?;
        self.save(&ledger).await?;

        tracing::info!(
            %id,
            previous_net_amount_spent = previous_net,
            net_amount_spent = ledger.net_amount_spent(),
            "transaction updated"
        );

        Ok(TransactionResult {
            transaction,
            net_amount_spent: ledger.net_amount_spent(),
        })
    }

    /// Delete a transaction and return the new net amount.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<Cents, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut ledger = self.load_existing(id).await?;

        ledger
            .remove(id)?
            .ok_or(AppError::TransactionNotFound(id))?;
        self.save(&ledger).await?;

        tracing::info!(
            %id,
            remaining = ledger.len(),
            net_amount_spent = ledger.net_amount_spent(),
            "transaction deleted"
        );

        Ok(ledger.net_amount_spent())
    }

    /// Compare the stored net amount with the sum of the records.
    /// Drift is reported, never corrected.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let ledger = self.load().await?;

        let report = match ledger {
            Some(ledger) => {
                let recomputed = compute_net_amount(ledger.transactions());
                IntegrityReport {
                    transaction_count: ledger.len(),
                    net_amount_spent: ledger.net_amount_spent(),
                    recomputed_net_amount: recomputed,
                    drift: ledger.drift(),
                    created_at: Some(ledger.created_at()),
                    last_updated: Some(ledger.updated_at()),
                }
            }
            None => IntegrityReport {
                transaction_count: 0,
                net_amount_spent: 0,
                recomputed_net_amount: 0,
                drift: 0,
                created_at: None,
                last_updated: None,
            },
        };

        if !report.is_consistent() {
            tracing::warn!(
                stored = report.net_amount_spent,
                recomputed = report.recomputed_net_amount,
                "net amount has drifted from the transaction records"
            );
        }

        Ok(report)
    }
}
