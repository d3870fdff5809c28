//! Wallet repository integration tests: lazy creation, charge, spend, reads.

#![allow(clippy::uninlined_format_args)]

mod common;

use futures::future::join_all;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use uuid::Uuid;

use hearts_core::ledger::{LedgerError, TransactionType};
use hearts_db::entities::{heart_wallets, sea_orm_active_enums::TransactionType as DbTransactionType};
use hearts_db::repositories::{ChargeInput, SpendInput, WalletError, WalletRepository};
use hearts_shared::types::PageRequest;

use common::{charge, setup_db};

fn spend_input(user_id: Uuid, amount: i64) -> SpendInput {
    SpendInput {
        user_id,
        amount,
        description: "AI interview".to_string(),
        metadata: None,
    }
}

#[tokio::test]
async fn test_get_balance_without_wallet_is_zero_and_creates_nothing() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db.clone());
    let user_id = Uuid::new_v4();

    assert_eq!(wallets.get_balance(user_id).await.unwrap(), 0);
    assert!(heart_wallets::Entity::find_by_id(user_id).one(&db).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ensure_wallet_is_idempotent() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db.clone());
    let user_id = Uuid::new_v4();

    let first = wallets.ensure_wallet(user_id).await.unwrap();
    let second = wallets.ensure_wallet(user_id).await.unwrap();

    assert_eq!(first.balance, 0);
    assert_eq!(first.version, 0);
    assert_eq!(first, second);
    assert_eq!(heart_wallets::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ensure_wallet_creates_one_row() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db.clone());
    let user_id = Uuid::new_v4();

    let results = join_all((0..10).map(|_| {
        let wallets = wallets.clone();
        tokio::spawn(async move { wallets.ensure_wallet(user_id).await })
    }))
    .await;

    for result in results {
        assert_eq!(result.unwrap().unwrap().user_id, user_id);
    }
    assert_eq!(heart_wallets::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_charge_records_entry_and_balance() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    let entry = wallets
        .charge_hearts(ChargeInput {
            user_id,
            amount: 30,
            transaction_type: TransactionType::Charge,
            description: "top-up".to_string(),
            order_id: Some(order_id),
            metadata: Some(json!({ "source": "test" })),
        })
        .await
        .unwrap();

    assert_eq!(entry.amount, 30);
    assert_eq!(entry.balance_after, 30);
    assert_eq!(entry.wallet_version, 1);
    assert_eq!(entry.transaction_type, DbTransactionType::Charge);
    assert_eq!(entry.order_id, Some(order_id));
    let metadata: serde_json::Value =
        serde_json::from_str(entry.metadata.as_deref().unwrap()).unwrap();
    assert_eq!(metadata["source"], "test");
    assert_eq!(wallets.get_balance(user_id).await.unwrap(), 30);
}

#[tokio::test]
async fn test_charge_rejects_non_positive_amounts() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();

    for amount in [0, -1] {
        let err = wallets
            .charge_hearts(ChargeInput {
                user_id,
                amount,
                transaction_type: TransactionType::Charge,
                description: "bad".to_string(),
                order_id: None,
                metadata: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::Ledger(LedgerError::NonPositiveAmount(_))
        ));
    }
    assert!(wallets.recent_transactions(user_id, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_charge_rejects_spend_type() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();

    let err = wallets
        .charge_hearts(ChargeInput {
            user_id,
            amount: 5,
            transaction_type: TransactionType::Spend,
            description: "wrong type".to_string(),
            order_id: None,
            metadata: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WalletError::Ledger(LedgerError::InvalidTransactionType { .. })
    ));
    assert_eq!(wallets.get_balance(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_spend_to_zero_then_overdraft_is_rejected() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();
    charge(&wallets, user_id, 5).await;

    let entry = wallets.spend_hearts(spend_input(user_id, 5)).await.unwrap();
    assert_eq!(entry.amount, -5);
    assert_eq!(entry.balance_after, 0);
    assert_eq!(entry.transaction_type, DbTransactionType::Spend);

    let err = wallets.spend_hearts(spend_input(user_id, 1)).await.unwrap_err();
    assert!(err.is_insufficient_hearts());

    assert_eq!(wallets.get_balance(user_id).await.unwrap(), 0);
    let history = wallets.recent_transactions(user_id, 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(wallets.reconcile(user_id).await.unwrap().is_consistent());
}

#[tokio::test]
async fn test_spend_without_wallet_leaves_no_trace() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db.clone());
    let user_id = Uuid::new_v4();

    let err = wallets.spend_hearts(spend_input(user_id, 1)).await.unwrap_err();
    assert!(err.is_insufficient_hearts());
    assert!(heart_wallets::Entity::find_by_id(user_id).one(&db).await.unwrap().is_none());
}

#[tokio::test]
async fn test_assert_sufficient_balance() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();
    charge(&wallets, user_id, 3).await;

    assert!(wallets.assert_sufficient_balance(user_id, 3).await.is_ok());
    assert!(
        wallets
            .assert_sufficient_balance(user_id, 4)
            .await
            .unwrap_err()
            .is_insufficient_hearts()
    );
    assert!(matches!(
        wallets.assert_sufficient_balance(user_id, 0).await,
        Err(WalletError::Ledger(LedgerError::NonPositiveAmount(0)))
    ));
}

#[tokio::test]
async fn test_recent_and_paged_transactions_are_newest_first() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();
    for amount in 1..=12 {
        charge(&wallets, user_id, amount).await;
    }

    let recent = wallets.recent_transactions(user_id, 10).await.unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].amount, 12);
    assert_eq!(recent[0].balance_after, 78);
    assert!(recent.windows(2).all(|w| w[0].wallet_version > w[1].wallet_version));

    let (page, total) = wallets
        .list_transactions(user_id, PageRequest::new(2, 5, 50))
        .await
        .unwrap();
    assert_eq!(total, 12);
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].amount, 7);

    let (last, _) = wallets
        .list_transactions(user_id, PageRequest::new(3, 5, 50))
        .await
        .unwrap();
    assert_eq!(last.len(), 2);
}

#[tokio::test]
async fn test_reconcile_matches_history() {
    let db = setup_db().await;
    let wallets = WalletRepository::new(db);
    let user_id = Uuid::new_v4();
    charge(&wallets, user_id, 20).await;
    wallets.spend_hearts(spend_input(user_id, 7)).await.unwrap();

    let report = wallets.reconcile(user_id).await.unwrap();
    assert_eq!(report.balance, 13);
    assert_eq!(report.ledger_sum, 13);
    assert_eq!(report.latest_balance_after, Some(13));
    assert_eq!(report.entry_count, 2);
    assert!(report.is_consistent());
}
