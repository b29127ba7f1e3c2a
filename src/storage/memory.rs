use anyhow::{Context, Result};
use tokio::sync::RwLock;

use crate::domain::LedgerState;

use super::LedgerStore;

/// In-process document store.
///
/// The ledger is kept serialized so that every load hands out a fresh copy,
/// the same as reading from an external store.
#[derive(Default)]
pub struct MemoryStore {
    document: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing ledger document.
    pub fn with_ledger(ledger: &LedgerState) -> Result<Self> {
        let body = serde_json::to_string(ledger).context("Failed to encode ledger document")?;
        Ok(Self {
            document: RwLock::new(Some(body)),
        })
    }
}

impl LedgerStore for MemoryStore {
    async fn load_ledger(&self) -> Result<Option<LedgerState>> {
        let document = self.document.read().await;
        document
            .as_deref()
            .map(|body| serde_json::from_str(body).context("Invalid ledger document"))
            .transpose()
    }

    async fn save_ledger(&self, ledger: &LedgerState) -> Result<()> {
        let body = serde_json::to_string(ledger).context("Failed to encode ledger document")?;
        *self.document.write().await = Some(body);
        Ok(())
    }
}
