mod common;

use anyhow::Result;
use common::{parse_date, test_service, transaction};
use netspend::application::{AppError, LedgerService};
use netspend::domain::{TransactionType, ValidationError, compute_net_amount};
use uuid::Uuid;

#[tokio::test]
async fn test_running_net_amount_scenario() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // A: credit 100
    let first = service.create_transaction(transaction(10000, "credit")).await?;
    assert_eq!(first.net_amount_spent, 10000);

    // B: debit 30
    let second = service.create_transaction(transaction(3000, "debit")).await?;
    assert_eq!(second.net_amount_spent, 7000);

    // C: first becomes a debit of 50; old credit reversed, new debit applied
    let updated = service
        .update_transaction(first.transaction.id, transaction(5000, "debit"))
        .await?;
    assert_eq!(updated.net_amount_spent, -8000);
    assert_eq!(updated.transaction.id, first.transaction.id);
    assert_eq!(updated.transaction.transaction_type, TransactionType::Debit);

    // D: delete the debit of 30
    let net = service.delete_transaction(second.transaction.id).await?;
    assert_eq!(net, -5000);

    // E: delete the last one
    let net = service.delete_transaction(first.transaction.id).await?;
    assert_eq!(net, 0);

    let list = service.list_transactions().await?;
    assert!(list.transactions.is_empty());
    assert_eq!(list.net_amount_spent, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_then_get_roundtrip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let input = transaction(4599, "debit")
        .with_date(parse_date("2024-03-09"))
        .with_description("Cinema tickets")
        .with_payment_method("GooglePay")
        .with_category("entertainment");
    let created = service.create_transaction(input).await?;

    let fetched = service.get_transaction(created.transaction.id).await?;
    assert_eq!(fetched, created.transaction);
    assert_eq!(fetched.date, parse_date("2024-03-09"));
    assert_eq!(fetched.description, "Cinema tickets");
    assert_eq!(fetched.amount_cents, 4599);
    assert_eq!(fetched.payment_method, "GooglePay");
    assert_eq!(fetched.transaction_category, "entertainment");

    Ok(())
}

#[tokio::test]
async fn test_list_preserves_insertion_order_and_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut ids = Vec::new();
    for (amount, kind) in [(500, "debit"), (20000, "credit"), (125, "debit")] {
        ids.push(service.create_transaction(transaction(amount, kind)).await?.transaction.id);
    }

    let first = service.list_transactions().await?;
    let second = service.list_transactions().await?;
    assert_eq!(first, second);

    let listed: Vec<_> = first.transactions.iter().map(|t| t.id).collect();
    assert_eq!(listed, ids);
    assert_eq!(first.net_amount_spent, 19375);
    assert_eq!(first.net_amount_spent, compute_net_amount(&first.transactions));

    Ok(())
}

#[tokio::test]
async fn test_list_on_fresh_database() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let list = service.list_transactions().await?;
    assert!(list.transactions.is_empty());
    assert_eq!(list.net_amount_spent, 0);
    Ok(())
}

#[tokio::test]
async fn test_zero_amount_is_accepted() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.create_transaction(transaction(0, "credit")).await?;
    assert_eq!(result.transaction.amount_cents, 0);
    assert_eq!(result.net_amount_spent, 0);
    assert_eq!(service.list_transactions().await?.transactions.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_missing_category_is_rejected_without_side_effects() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.create_transaction(transaction(1000, "credit")).await?;

    let mut input = transaction(2500, "debit");
    input.transaction_category = None;
    let err = service.create_transaction(input).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::MissingFields(ref fields))
            if fields == &vec!["transactionCategory"]
    ));
    assert_eq!(err.status_code(), 400);

    let list = service.list_transactions().await?;
    assert_eq!(list.transactions.len(), 1);
    assert_eq!(list.net_amount_spent, 1000);

    Ok(())
}

#[tokio::test]
async fn test_invalid_update_leaves_record_untouched() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let created = service.create_transaction(transaction(1000, "credit")).await?;

    let err = service
        .update_transaction(created.transaction.id, transaction(1000, "refund"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::UnknownTransactionType(_))
    ));

    let err = service
        .update_transaction(created.transaction.id, transaction(1000, "debit").with_description("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::BlankDescription)));

    let err = service
        .update_transaction(created.transaction.id, transaction(1000, "DEBIT"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    assert_eq!(
        service.get_transaction(created.transaction.id).await?,
        created.transaction
    );
    assert_eq!(service.list_transactions().await?.net_amount_spent, 1000);

    Ok(())
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let created = service.create_transaction(transaction(700, "debit")).await?;
    let id = created.transaction.id;

    service.delete_transaction(id).await?;

    let err = service.get_transaction(id).await.unwrap_err();
    assert!(matches!(err, AppError::TransactionNotFound(missing) if missing == id));
    assert_eq!(err.status_code(), 404);

    let err = service.delete_transaction(id).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.create_transaction(transaction(700, "debit")).await?;

    let err = service
        .update_transaction(Uuid::new_v4(), transaction(100, "credit"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(service.list_transactions().await?.net_amount_spent, -700);

    Ok(())
}

#[tokio::test]
async fn test_ledger_persists_across_connections() -> Result<()> {
    let (service, temp) = test_service().await?;
    let created = service.create_transaction(transaction(12345, "credit")).await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reopened = LedgerService::connect(db_path.to_str().unwrap()).await?;

    let list = reopened.list_transactions().await?;
    assert_eq!(list.transactions, vec![created.transaction]);
    assert_eq!(list.net_amount_spent, 12345);

    Ok(())
}

#[tokio::test]
async fn test_connect_to_missing_database_fails() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let db_path = temp.path().join("missing.db");

    let result = LedgerService::connect(db_path.to_str().unwrap()).await;
    assert!(matches!(result, Err(AppError::Store(_))));

    Ok(())
}

#[tokio::test]
async fn test_integrity_check_on_consistent_ledger() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let report = service.check_integrity().await?;
    assert_eq!(report.transaction_count, 0);
    assert!(report.created_at.is_none());
    assert!(report.last_updated.is_none());
    assert!(report.is_consistent());

    service.create_transaction(transaction(900, "credit")).await?;
    service.create_transaction(transaction(1900, "debit")).await?;

    let report = service.check_integrity().await?;
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.net_amount_spent, -1000);
    assert_eq!(report.recomputed_net_amount, -1000);
    assert!(report.is_consistent());
    let created = report.created_at.unwrap();
    assert!(report.last_updated.unwrap() >= created);

    Ok(())
}
