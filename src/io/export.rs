use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Cents, TransactionRecord, format_cents};
use crate::storage::LedgerStore;

/// Ledger snapshot for full export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub net_amount_spent: Cents,
    pub transactions: Vec<TransactionRecord>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a, S> {
    service: &'a LedgerService<S>,
}

impl<'a, S: LedgerStore> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Export transactions to CSV format
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let list = self.service.list_transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "description",
            "amount",
            "payment_method",
            "category",
            "type",
        ])?;

        for transaction in &list.transactions {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.description.clone(),
                format_cents(transaction.amount_cents),
                transaction.payment_method.clone(),
                transaction.transaction_category.clone(),
                transaction.transaction_type.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(list.transactions.len())
    }

    /// Export transactions as a JSON array
    pub async fn export_transactions_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let list = self.service.list_transactions().await?;

        let json = serde_json::to_string_pretty(&list.transactions)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(list.transactions.len())
    }

    /// Export the whole ledger as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let list = self.service.list_transactions().await?;

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            net_amount_spent: list.net_amount_spent,
            transactions: list.transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::TransactionInput;
    use crate::storage::MemoryStore;

    async fn seeded_service() -> LedgerService<MemoryStore> {
        let service = LedgerService::new(MemoryStore::new());
        service
            .create_transaction(
                TransactionInput::new()
                    .with_date(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
                    .with_description("Rent, April")
                    .with_amount(120050)
                    .with_payment_method("CreditCard")
                    .with_category("bills")
                    .with_type("debit"),
            )
            .await
            .unwrap();
        service
    }

    #[tokio::test]
    async fn test_export_transactions_csv() -> Result<()> {
        let service = seeded_service().await;
        let mut out = Vec::new();

        let count = Exporter::new(&service)
            .export_transactions_csv(&mut out)
            .await?;
        assert_eq!(count, 1);

        let text = String::from_utf8(out)?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,description,amount,payment_method,category,type")
        );
        let row = lines.next().unwrap();
        assert!(row.ends_with(",2024-04-10,\"Rent, April\",1200.50,CreditCard,bills,debit"));
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_export_full_json() -> Result<()> {
        let service = seeded_service().await;
        let mut out = Vec::new();

        let snapshot = Exporter::new(&service).export_full_json(&mut out).await?;
        assert_eq!(snapshot.net_amount_spent, -120050);

        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["netAmountSpent"], -120050);
        assert_eq!(value["transactions"][0]["paymentMethod"], "CreditCard");
        Ok(())
    }

    #[tokio::test]
    async fn test_export_empty_ledger() -> Result<()> {
        let service = LedgerService::new(MemoryStore::new());
        let mut out = Vec::new();

        let count = Exporter::new(&service)
            .export_transactions_json(&mut out)
            .await?;
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out)?, "[]");
        Ok(())
    }
}
