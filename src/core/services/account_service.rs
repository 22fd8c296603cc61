//! Account registry: CRUD plus the uniqueness and lifecycle rules that
//! guard it.

use uuid::Uuid;

use crate::domain::{Account, AccountKind, AccountStatus, MAX_NAME_LEN};
use crate::errors::{ErrorCode, LedgerError, Result};
use crate::store::Store;

use super::load_account;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub kind: AccountKind,
    pub parent_account: Option<Uuid>,
    pub balance: i64,
}

impl CreateAccount {
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent_account: None,
            balance: 0,
        }
    }

    pub fn with_balance(mut self, balance: i64) -> Self {
        self.balance = balance;
        self
    }
}

/// Partial update; unset fields are left untouched. Account kind is
/// immutable and deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub status: Option<AccountStatus>,
    pub balance: Option<i64>,
    pub parent_account: Option<Uuid>,
}

/// Account enriched with how many transfers reference it.
#[derive(Debug, Clone)]
pub struct AccountActivity {
    pub account: Account,
    pub transaction_count: usize,
}

pub struct AccountService;

impl AccountService {
    pub fn create(store: &dyn Store, input: CreateAccount) -> Result<Account> {
        validate_name(&input.name)?;
        ensure_unique_name(store, &input.name, input.kind, None)?;
        let mut account = Account::new(input.name, input.kind, input.balance);
        account.parent_account = input.parent_account;
        store.save_account(&account)?;
        tracing::info!(id = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    pub fn update(store: &dyn Store, id: Uuid, changes: UpdateAccount) -> Result<Account> {
        let mut account = load_account(store, id, "id")?;
        if let Some(name) = changes.name {
            validate_name(&name)?;
            ensure_unique_name(store, &name, account.kind, Some(id))?;
            account.name = name;
        }
        if let Some(status) = changes.status {
            account.status = status;
        }
        if let Some(balance) = changes.balance {
            account.balance = balance;
        }
        if let Some(parent) = changes.parent_account {
            account.parent_account = Some(parent);
        }
        account.touch();
        store.save_account(&account)?;
        Ok(account)
    }

    /// Deletes an archived account with no linked transfers. Active
    /// accounts and accounts still referenced by transactions are
    /// protected.
    pub fn delete(store: &dyn Store, id: Uuid) -> Result<()> {
        let account = load_account(store, id, "id")?;
        if account.status != AccountStatus::Archived {
            return Err(LedgerError::rule(
                ErrorCode::AccountActive,
                format!("account `{}` must be archived before deletion", account.name),
            ));
        }
        let referenced = store
            .transactions()?
            .iter()
            .any(|txn| txn.from_account == id || txn.to_account == id);
        if referenced {
            return Err(LedgerError::rule(
                ErrorCode::HasTransactions,
                format!("account `{}` still has linked transactions", account.name),
            ));
        }
        store.delete_account(id)?;
        tracing::info!(id = %id, "account deleted");
        Ok(())
    }

    /// Read-only enrichment joining the transaction collection by count.
    pub fn get_with_transaction_count(store: &dyn Store, id: Uuid) -> Result<AccountActivity> {
        let account = load_account(store, id, "id")?;
        let transaction_count = store
            .transactions()?
            .iter()
            .filter(|txn| txn.from_account == id || txn.to_account == id)
            .count();
        Ok(AccountActivity {
            account,
            transaction_count,
        })
    }

    pub fn list(store: &dyn Store) -> Result<Vec<Account>> {
        store.accounts()
    }
}

fn validate_name(candidate: &str) -> Result<()> {
    if candidate.trim().is_empty() {
        return Err(LedgerError::required("name"));
    }
    if candidate.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::max_length("name", MAX_NAME_LEN));
    }
    Ok(())
}

/// Names are unique case-insensitively within an account kind; the same
/// name may exist across kinds.
fn ensure_unique_name(
    store: &dyn Store,
    candidate: &str,
    kind: AccountKind,
    exclude: Option<Uuid>,
) -> Result<()> {
    let normalized = candidate.trim().to_ascii_lowercase();
    let duplicate = store.accounts()?.iter().any(|account| {
        account.kind == kind
            && account.name.trim().to_ascii_lowercase() == normalized
            && exclude.map_or(true, |id| account.id != id)
    });
    if duplicate {
        return Err(LedgerError::validation(
            "name",
            ErrorCode::DuplicateName,
            format!("account `{candidate}` already exists for this kind"),
        ));
    }
    Ok(())
}
