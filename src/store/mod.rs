pub mod json_backend;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Account, Identifiable, NetWorthSnapshot, RecurringTransaction, Transaction, Validate,
};
use crate::errors::{LedgerError, Result};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Schema tag written into every persisted collection container.
pub const CONTAINER_VERSION: &str = "1";
/// Format tag for full export bundles.
pub const BUNDLE_VERSION: &str = "1";

/// Version-tagged collection container, the unit of persistence for each
/// entity collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Container<T> {
    pub version: String,
    #[serde(default)]
    pub data: Vec<T>,
}

impl<T> Container<T> {
    pub fn new() -> Self {
        Self {
            version: CONTAINER_VERSION.into(),
            data: Vec::new(),
        }
    }

    pub fn with_data(data: Vec<T>) -> Self {
        Self {
            version: CONTAINER_VERSION.into(),
            data,
        }
    }
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Full dataset snapshot used by export and all-or-nothing import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub recurring: Vec<RecurringTransaction>,
    #[serde(default)]
    pub net_worth_snapshots: Vec<NetWorthSnapshot>,
}

impl ExportBundle {
    pub fn new(
        accounts: Vec<Account>,
        transactions: Vec<Transaction>,
        recurring: Vec<RecurringTransaction>,
        net_worth_snapshots: Vec<NetWorthSnapshot>,
    ) -> Self {
        Self {
            version: BUNDLE_VERSION.into(),
            exported_at: Utc::now(),
            accounts,
            transactions,
            recurring,
            net_worth_snapshots,
        }
    }

    /// Validates every record in the bundle. Import rejects the whole
    /// bundle when any single record is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.version != BUNDLE_VERSION {
            return Err(LedgerError::Storage(format!(
                "unsupported export bundle version `{}`",
                self.version
            )));
        }
        for account in &self.accounts {
            account.validate()?;
        }
        for transaction in &self.transactions {
            transaction.validate()?;
        }
        for template in &self.recurring {
            template.validate()?;
        }
        for snapshot in &self.net_worth_snapshots {
            snapshot.validate()?;
        }
        Ok(())
    }
}

/// Abstraction over persistence backends holding the four entity
/// collections. Every `save_*` validates structural invariants before
/// accepting the write; the store never enforces business rules.
pub trait Store: Send + Sync {
    fn accounts(&self) -> Result<Vec<Account>>;
    fn account(&self, id: Uuid) -> Result<Account>;
    fn save_account(&self, account: &Account) -> Result<()>;
    fn delete_account(&self, id: Uuid) -> Result<()>;

    fn transactions(&self) -> Result<Vec<Transaction>>;
    fn transaction(&self, id: Uuid) -> Result<Transaction>;
    fn save_transaction(&self, transaction: &Transaction) -> Result<()>;
    fn delete_transaction(&self, id: Uuid) -> Result<()>;

    fn recurring_transactions(&self) -> Result<Vec<RecurringTransaction>>;
    fn recurring_transaction(&self, id: Uuid) -> Result<RecurringTransaction>;
    fn save_recurring_transaction(&self, template: &RecurringTransaction) -> Result<()>;
    fn delete_recurring_transaction(&self, id: Uuid) -> Result<()>;

    fn net_worth_snapshots(&self) -> Result<Vec<NetWorthSnapshot>>;
    fn net_worth_snapshot(&self, id: Uuid) -> Result<NetWorthSnapshot>;
    fn save_net_worth_snapshot(&self, snapshot: &NetWorthSnapshot) -> Result<()>;
    fn delete_net_worth_snapshot(&self, id: Uuid) -> Result<()>;

    /// Consistent snapshot of all four collections.
    fn export_all(&self) -> Result<ExportBundle>;
    /// Replaces every collection with the bundle contents. The bundle is
    /// validated in full first; partial imports never happen.
    fn import_all(&self, bundle: &ExportBundle) -> Result<()>;
}

pub(crate) fn upsert_entity<T: Identifiable + Clone>(data: &mut Vec<T>, entity: &T) {
    match data.iter_mut().find(|existing| existing.id() == entity.id()) {
        Some(slot) => *slot = entity.clone(),
        None => data.push(entity.clone()),
    }
}

pub(crate) fn find_entity<T: Identifiable + Clone>(
    data: &[T],
    id: Uuid,
    entity: &'static str,
) -> Result<T> {
    data.iter()
        .find(|item| item.id() == id)
        .cloned()
        .ok_or_else(|| LedgerError::not_found(entity, "id", id))
}

pub(crate) fn remove_entity<T: Identifiable>(
    data: &mut Vec<T>,
    id: Uuid,
    entity: &'static str,
) -> Result<()> {
    let before = data.len();
    data.retain(|item| item.id() != id);
    if data.len() == before {
        return Err(LedgerError::not_found(entity, "id", id));
    }
    Ok(())
}
