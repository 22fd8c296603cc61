use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::{Account, NetWorthSnapshot, RecurringTransaction, Transaction, Validate};
use crate::errors::Result;

use super::{find_entity, remove_entity, upsert_entity, ExportBundle, Store};

/// In-memory store with the same contract as the JSON backend. Backs
/// unit tests and embedded use where durability is not needed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

#[derive(Debug, Default)]
struct Collections {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    recurring: Vec<RecurringTransaction>,
    snapshots: Vec<NetWorthSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> R {
        let mut guard = self.inner.lock().expect("memory store mutex poisoned");
        f(&mut guard)
    }
}

impl Store for MemoryStore {
    fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.with(|c| c.accounts.clone()))
    }

    fn account(&self, id: Uuid) -> Result<Account> {
        self.with(|c| find_entity(&c.accounts, id, "account"))
    }

    fn save_account(&self, account: &Account) -> Result<()> {
        account.validate()?;
        self.with(|c| upsert_entity(&mut c.accounts, account));
        Ok(())
    }

    fn delete_account(&self, id: Uuid) -> Result<()> {
        self.with(|c| remove_entity(&mut c.accounts, id, "account"))
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.with(|c| c.transactions.clone()))
    }

    fn transaction(&self, id: Uuid) -> Result<Transaction> {
        self.with(|c| find_entity(&c.transactions, id, "transaction"))
    }

    fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        transaction.validate()?;
        self.with(|c| upsert_entity(&mut c.transactions, transaction));
        Ok(())
    }

    fn delete_transaction(&self, id: Uuid) -> Result<()> {
        self.with(|c| remove_entity(&mut c.transactions, id, "transaction"))
    }

    fn recurring_transactions(&self) -> Result<Vec<RecurringTransaction>> {
        Ok(self.with(|c| c.recurring.clone()))
    }

    fn recurring_transaction(&self, id: Uuid) -> Result<RecurringTransaction> {
        self.with(|c| find_entity(&c.recurring, id, "recurring transaction"))
    }

    fn save_recurring_transaction(&self, template: &RecurringTransaction) -> Result<()> {
        template.validate()?;
        self.with(|c| upsert_entity(&mut c.recurring, template));
        Ok(())
    }

    fn delete_recurring_transaction(&self, id: Uuid) -> Result<()> {
        self.with(|c| remove_entity(&mut c.recurring, id, "recurring transaction"))
    }

    fn net_worth_snapshots(&self) -> Result<Vec<NetWorthSnapshot>> {
        Ok(self.with(|c| c.snapshots.clone()))
    }

    fn net_worth_snapshot(&self, id: Uuid) -> Result<NetWorthSnapshot> {
        self.with(|c| find_entity(&c.snapshots, id, "net worth snapshot"))
    }

    fn save_net_worth_snapshot(&self, snapshot: &NetWorthSnapshot) -> Result<()> {
        snapshot.validate()?;
        self.with(|c| upsert_entity(&mut c.snapshots, snapshot));
        Ok(())
    }

    fn delete_net_worth_snapshot(&self, id: Uuid) -> Result<()> {
        self.with(|c| remove_entity(&mut c.snapshots, id, "net worth snapshot"))
    }

    fn export_all(&self) -> Result<ExportBundle> {
        Ok(self.with(|c| {
            ExportBundle::new(
                c.accounts.clone(),
                c.transactions.clone(),
                c.recurring.clone(),
                c.snapshots.clone(),
            )
        }))
    }

    fn import_all(&self, bundle: &ExportBundle) -> Result<()> {
        bundle.validate()?;
        self.with(|c| {
            c.accounts = bundle.accounts.clone();
            c.transactions = bundle.transactions.clone();
            c.recurring = bundle.recurring.clone();
            c.snapshots = bundle.net_worth_snapshots.clone();
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountKind, Frequency};
    use crate::errors::ErrorCode;

    #[test]
    fn save_is_an_upsert_by_id() {
        let store = MemoryStore::new();
        let mut account = Account::new("Checking", AccountKind::Asset, 0);
        store.save_account(&account).unwrap();

        account.balance = 7_500;
        store.save_account(&account).unwrap();

        let accounts = store.accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance, 7_500);
    }

    #[test]
    fn lookup_of_missing_id_reports_not_found() {
        let store = MemoryStore::new();
        let err = store.account(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn save_rejects_structurally_invalid_entities() {
        let store = MemoryStore::new();
        let template =
            RecurringTransaction::new(Uuid::new_v4(), Uuid::new_v4(), -1, "Rent", Frequency::Monthly);
        let err = store.save_recurring_transaction(&template).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
        assert!(store.recurring_transactions().unwrap().is_empty());
    }

    #[test]
    fn delete_of_missing_id_reports_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_transaction(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
