use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::domain::{
    Account, Identifiable, NetWorthSnapshot, RecurringTransaction, Transaction, Validate,
};
use crate::errors::{LedgerError, Result};

use super::{
    find_entity, remove_entity, upsert_entity, Container, ExportBundle, Store, CONTAINER_VERSION,
};

const ACCOUNTS_FILE: &str = "accounts.json";
const TRANSACTIONS_FILE: &str = "transactions.json";
const RECURRING_FILE: &str = "recurring.json";
const SNAPSHOTS_FILE: &str = "net_worth.json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence. Each collection lives in its own
/// version-tagged container file under the store root; writes stage to a
/// temporary file and rename into place.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Opens the store at the configured data directory.
    pub fn open_default() -> Result<Self> {
        let config = StoreConfig::load_or_default(None)?;
        Self::new(config.data_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn read_container<T: DeserializeOwned>(&self, file: &str) -> Result<Container<T>> {
        let path = self.collection_path(file);
        if !path.exists() {
            return Ok(Container::new());
        }
        let data = fs::read_to_string(&path)?;
        let container: Container<T> = serde_json::from_str(&data).map_err(|err| {
            LedgerError::Storage(format!("corrupt container `{file}`: {err}"))
        })?;
        if container.version != CONTAINER_VERSION {
            return Err(LedgerError::Storage(format!(
                "container `{file}` has unsupported version `{}`",
                container.version
            )));
        }
        Ok(container)
    }

    fn write_container<T: Serialize>(&self, file: &str, container: &Container<T>) -> Result<()> {
        let path = self.collection_path(file);
        let json = serde_json::to_string_pretty(container)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(file, "container written");
        Ok(())
    }

    fn save_entity<T>(&self, file: &str, entity: &T) -> Result<()>
    where
        T: Identifiable + Validate + Clone + Serialize + DeserializeOwned,
    {
        entity.validate()?;
        let mut container = self.read_container::<T>(file)?;
        upsert_entity(&mut container.data, entity);
        self.write_container(file, &container)
    }

    fn delete_entity<T>(&self, file: &str, id: Uuid, entity_name: &'static str) -> Result<()>
    where
        T: Identifiable + Clone + Serialize + DeserializeOwned,
    {
        let mut container = self.read_container::<T>(file)?;
        remove_entity(&mut container.data, id, entity_name)?;
        self.write_container(file, &container)
    }
}

impl Store for JsonStore {
    fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.read_container(ACCOUNTS_FILE)?.data)
    }

    fn account(&self, id: Uuid) -> Result<Account> {
        find_entity(&self.read_container(ACCOUNTS_FILE)?.data, id, "account")
    }

    fn save_account(&self, account: &Account) -> Result<()> {
        self.save_entity(ACCOUNTS_FILE, account)
    }

    fn delete_account(&self, id: Uuid) -> Result<()> {
        self.delete_entity::<Account>(ACCOUNTS_FILE, id, "account")
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.read_container(TRANSACTIONS_FILE)?.data)
    }

    fn transaction(&self, id: Uuid) -> Result<Transaction> {
        find_entity(
            &self.read_container(TRANSACTIONS_FILE)?.data,
            id,
            "transaction",
        )
    }

    fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.save_entity(TRANSACTIONS_FILE, transaction)
    }

    fn delete_transaction(&self, id: Uuid) -> Result<()> {
        self.delete_entity::<Transaction>(TRANSACTIONS_FILE, id, "transaction")
    }

    fn recurring_transactions(&self) -> Result<Vec<RecurringTransaction>> {
        Ok(self.read_container(RECURRING_FILE)?.data)
    }

    fn recurring_transaction(&self, id: Uuid) -> Result<RecurringTransaction> {
        find_entity(
            &self.read_container(RECURRING_FILE)?.data,
            id,
            "recurring transaction",
        )
    }

    fn save_recurring_transaction(&self, template: &RecurringTransaction) -> Result<()> {
        self.save_entity(RECURRING_FILE, template)
    }

    fn delete_recurring_transaction(&self, id: Uuid) -> Result<()> {
        self.delete_entity::<RecurringTransaction>(RECURRING_FILE, id, "recurring transaction")
    }

    fn net_worth_snapshots(&self) -> Result<Vec<NetWorthSnapshot>> {
        Ok(self.read_container(SNAPSHOTS_FILE)?.data)
    }

    fn net_worth_snapshot(&self, id: Uuid) -> Result<NetWorthSnapshot> {
        find_entity(
            &self.read_container(SNAPSHOTS_FILE)?.data,
            id,
            "net worth snapshot",
        )
    }

    fn save_net_worth_snapshot(&self, snapshot: &NetWorthSnapshot) -> Result<()> {
        self.save_entity(SNAPSHOTS_FILE, snapshot)
    }

    fn delete_net_worth_snapshot(&self, id: Uuid) -> Result<()> {
        self.delete_entity::<NetWorthSnapshot>(SNAPSHOTS_FILE, id, "net worth snapshot")
    }

    fn export_all(&self) -> Result<ExportBundle> {
        Ok(ExportBundle::new(
            self.accounts()?,
            self.transactions()?,
            self.recurring_transactions()?,
            self.net_worth_snapshots()?,
        ))
    }

    fn import_all(&self, bundle: &ExportBundle) -> Result<()> {
        bundle.validate()?;
        self.write_container(ACCOUNTS_FILE, &Container::with_data(bundle.accounts.clone()))?;
        self.write_container(
            TRANSACTIONS_FILE,
            &Container::with_data(bundle.transactions.clone()),
        )?;
        self.write_container(RECURRING_FILE, &Container::with_data(bundle.recurring.clone()))?;
        self.write_container(
            SNAPSHOTS_FILE,
            &Container::with_data(bundle.net_worth_snapshots.clone()),
        )?;
        tracing::info!(
            accounts = bundle.accounts.len(),
            transactions = bundle.transactions.len(),
            "import replaced all collections"
        );
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
