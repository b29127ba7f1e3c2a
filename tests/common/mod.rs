// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, bail};
use chrono::NaiveDate;
use netspend::application::LedgerService;
use netspend::domain::{Cents, LedgerState, TransactionInput};
use netspend::storage::{LedgerStore, MemoryStore};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// A complete input with the given amount and type
pub fn transaction(amount_cents: Cents, transaction_type: &str) -> TransactionInput {
    TransactionInput::new()
        .with_date(parse_date("2024-01-15"))
        .with_description("test transaction")
        .with_amount(amount_cents)
        .with_payment_method("Cash")
        .with_category("misc")
        .with_type(transaction_type)
}

/// Memory store whose saves can be made to fail
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_saves: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl LedgerStore for FlakyStore {
    async fn load_ledger(&self) -> Result<Option<LedgerState>> {
        self.inner.load_ledger().await
    }

    async fn save_ledger(&self, ledger: &LedgerState) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            bail!("simulated write failure");
        }
        self.inner.save_ledger(ledger).await
    }
}
