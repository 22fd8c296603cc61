pub mod account_service;
pub mod net_worth_service;
pub mod recurring_service;
pub mod transaction_service;

pub use account_service::{AccountActivity, AccountService, CreateAccount, UpdateAccount};
pub use net_worth_service::{NetWorthService, NetWorthSummary};
pub use recurring_service::{CreateRecurring, RecurringService, UpdateRecurring};
pub use transaction_service::{CreateTransaction, TransactionService};

use uuid::Uuid;

use crate::domain::Account;
use crate::errors::{LedgerError, Result};
use crate::store::Store;

/// Loads an account while attributing a lookup miss to the caller's
/// input field rather than the store's generic `id`.
pub(crate) fn load_account(store: &dyn Store, id: Uuid, field: &'static str) -> Result<Account> {
    store.account(id).map_err(|err| match err {
        LedgerError::NotFound { entity, id, .. } => LedgerError::NotFound { entity, field, id },
        other => other,
    })
}
