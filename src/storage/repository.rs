use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::domain::LedgerState;

use super::{LEDGER_DOCUMENT, LedgerStore, MIGRATION_001_LEDGER_DOCUMENTS};

/// SQLite-backed document store for the ledger.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_LEDGER_DOCUMENTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Fetch the raw JSON body of a named document.
    pub async fn load_document(&self, name: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT body FROM ledger_documents WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch document '{}'", name))?;

        Ok(row.map(|row| row.get("body")))
    }

    /// Insert or replace a named document.
    pub async fn save_document(&self, name: &str, body: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ledger_documents (name, body, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(name)
        .bind(body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save document '{}'", name))?;
        Ok(())
    }
}

impl LedgerStore for Repository {
    async fn load_ledger(&self) -> Result<Option<LedgerState>> {
        let Some(body) = self.load_document(LEDGER_DOCUMENT).await? else {
            tracing::debug!("no ledger document stored yet");
            return Ok(None);
        };

        let ledger: LedgerState =
            serde_json::from_str(&body).context("Invalid ledger document")?;
        tracing::debug!(transactions = ledger.len(), "loaded ledger document");
        Ok(Some(ledger))
    }

    async fn save_ledger(&self, ledger: &LedgerState) -> Result<()> {
        let body = serde_json::to_string(ledger).context("Failed to encode ledger document")?;
        self.save_document(LEDGER_DOCUMENT, &body).await?;
        tracing::debug!(transactions = ledger.len(), "saved ledger document");
        Ok(())
    }
}
