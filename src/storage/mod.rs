use std::future::Future;

use anyhow::Result;

use crate::domain::LedgerState;

mod memory;
mod repository;

pub use memory::*;
pub use repository::*;

/// SQL migration for the document table
pub const MIGRATION_001_LEDGER_DOCUMENTS: &str =
    include_str!("migrations/001_ledger_documents.sql");

/// Key under which the singleton ledger document is stored
pub const LEDGER_DOCUMENT: &str = "transactions";

/// Whole-document persistence for the ledger.
///
/// Implementations load and save the ledger as one unit. There is no partial
/// update and no compare-and-swap: the last save wins.
pub trait LedgerStore: Send + Sync {
    /// Load the ledger document, or `None` if nothing has been saved yet.
    fn load_ledger(&self) -> impl Future<Output = Result<Option<LedgerState>>> + Send;

    /// Replace the stored ledger document.
    fn save_ledger(&self, ledger: &LedgerState) -> impl Future<Output = Result<()>> + Send;
}
