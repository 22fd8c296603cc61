use chrono::{NaiveDate, Utc};
use tally_core::core::services::{
    AccountService, CreateAccount, CreateRecurring, CreateTransaction, NetWorthService,
    RecurringService, TransactionService,
};
use tally_core::domain::{AccountKind, Frequency, Transaction};
use tally_core::errors::ErrorCode;
use tally_core::store::{MemoryStore, Store};
use uuid::Uuid;

mod common;

fn populated_store() -> MemoryStore {
    let store = MemoryStore::new();
    let checking = AccountService::create(
        &store,
        CreateAccount::new("Checking", AccountKind::Asset).with_balance(200_000),
    )
    .unwrap();
    let rent =
        AccountService::create(&store, CreateAccount::new("Rent", AccountKind::Expense)).unwrap();
    TransactionService::record(
        &store,
        CreateTransaction::new(checking.id, rent.id, 90_000, "May rent", Utc::now().date_naive()),
    )
    .unwrap();
    RecurringService::create(
        &store,
        CreateRecurring::new(checking.id, rent.id, 90_000, "Rent", Frequency::Monthly),
    )
    .unwrap();
    NetWorthService::create_snapshot(&store, Utc::now().date_naive()).unwrap();
    store
}

#[test]
fn export_import_round_trips_across_backends() {
    let source = populated_store();
    let bundle = source.export_all().unwrap();
    assert_eq!(bundle.version, "1");

    let target = common::setup_json_store();
    target.import_all(&bundle).unwrap();

    assert_eq!(target.accounts().unwrap().len(), 2);
    assert_eq!(target.transactions().unwrap().len(), 1);
    assert_eq!(target.recurring_transactions().unwrap().len(), 1);
    assert_eq!(target.net_worth_snapshots().unwrap().len(), 1);
    assert_eq!(
        target.export_all().unwrap().accounts,
        bundle.accounts,
        "collections must survive the round trip unchanged"
    );
}

#[test]
fn import_replaces_existing_collections_entirely() {
    let target = common::setup_json_store();
    AccountService::create(&target, CreateAccount::new("Stale", AccountKind::Asset)).unwrap();

    let bundle = populated_store().export_all().unwrap();
    target.import_all(&bundle).unwrap();

    let names: Vec<String> = target
        .accounts()
        .unwrap()
        .into_iter()
        .map(|account| account.name)
        .collect();
    assert!(!names.contains(&"Stale".to_string()));
    assert_eq!(names.len(), 2);
}

#[test]
fn one_invalid_record_rejects_the_whole_bundle() {
    let mut bundle = populated_store().export_all().unwrap();
    let mut bad = Transaction::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        10,
        "ok",
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    );
    bad.amount = 0;
    bundle.transactions.push(bad);

    let target = common::setup_json_store();
    AccountService::create(&target, CreateAccount::new("Keep me", AccountKind::Asset)).unwrap();

    let err = target.import_all(&bundle).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAmount);

    // Nothing was replaced.
    let accounts = target.accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].name, "Keep me");
    assert!(target.transactions().unwrap().is_empty());
}

#[test]
fn bundles_from_unknown_format_versions_are_rejected() {
    let mut bundle = populated_store().export_all().unwrap();
    bundle.version = "99".into();

    let target = common::setup_json_store();
    let err = target.import_all(&bundle).unwrap_err();
    assert_eq!(err.code(), ErrorCode::StorageError);
}
