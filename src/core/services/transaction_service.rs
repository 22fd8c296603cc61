//! The transaction ledger: validates transfers, applies the dual-account
//! balance update, and rolls the balances back when a later step fails.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Account, AccountKind, Transaction, MAX_DESCRIPTION_LEN};
use crate::errors::{ErrorCode, LedgerError, Result};
use crate::store::Store;

use super::load_account;

/// Input for recording a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub amount: i64,
    pub description: String,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl CreateTransaction {
    pub fn new(
        from_account: Uuid,
        to_account: Uuid,
        amount: i64,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            from_account,
            to_account,
            amount,
            description: description.into(),
            date,
            category: None,
            tags: Vec::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.from_account == self.to_account {
            return Err(LedgerError::validation(
                "to_account",
                ErrorCode::SameAccount,
                "source and destination accounts must differ",
            ));
        }
        if self.amount <= 0 {
            return Err(LedgerError::validation(
                "amount",
                ErrorCode::InvalidAmount,
                format!("amount must be a positive integer, got {}", self.amount),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(LedgerError::required("description"));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(LedgerError::max_length("description", MAX_DESCRIPTION_LEN));
        }
        if self.date > Utc::now().date_naive() {
            return Err(LedgerError::validation(
                "date",
                ErrorCode::FutureDate,
                format!("transaction date {} is in the future", self.date),
            ));
        }
        Ok(())
    }
}

/// The only component allowed to mutate account balances.
pub struct TransactionService;

impl TransactionService {
    pub fn record(store: &dyn Store, input: CreateTransaction) -> Result<Transaction> {
        input.validate()?;

        let from = load_account(store, input.from_account, "from_account")?;
        let to = load_account(store, input.to_account, "to_account")?;

        // Direction rule: expense accounts only receive, income accounts
        // only send.
        if from.kind == AccountKind::Expense {
            return Err(LedgerError::rule(
                ErrorCode::InvalidDirection,
                format!("expense account `{}` cannot be a transfer source", from.name),
            ));
        }
        if to.kind == AccountKind::Income {
            return Err(LedgerError::rule(
                ErrorCode::InvalidDirection,
                format!("income account `{}` cannot be a transfer destination", to.name),
            ));
        }

        // Income sources track cumulative inflow and may overdraw; every
        // other kind needs covering funds.
        if from.kind != AccountKind::Income && from.balance < input.amount {
            return Err(LedgerError::rule(
                ErrorCode::InsufficientBalance,
                format!(
                    "account `{}` holds {} but the transfer needs {}",
                    from.name, from.balance, input.amount
                ),
            ));
        }

        let mut debited = from.clone();
        debited.balance -= input.amount;
        debited.touch();
        store.save_account(&debited)?;

        let mut credited = to.clone();
        credited.balance += input.amount;
        credited.touch();
        if let Err(err) = store.save_account(&credited) {
            // Credit failed after the debit landed: restore the source.
            compensate(store, &from);
            return Err(err);
        }

        let mut transaction = Transaction::new(
            input.from_account,
            input.to_account,
            input.amount,
            input.description,
            input.date,
        );
        transaction.category = input.category;
        transaction.tags = input.tags;
        if let Err(err) = store.save_transaction(&transaction) {
            // Record failed after both balances moved: restore both sides.
            compensate(store, &from);
            compensate(store, &to);
            return Err(err);
        }

        tracing::info!(id = %transaction.id, amount = transaction.amount, "transaction recorded");
        Ok(transaction)
    }

    /// Deletes a transfer, reversing its effect on whichever of the two
    /// accounts still exist. With both present this restores the exact
    /// pre-transaction balances.
    pub fn delete(store: &dyn Store, id: Uuid) -> Result<Transaction> {
        let transaction = store.transaction(id)?;

        match store.account(transaction.from_account) {
            Ok(mut source) => {
                source.balance += transaction.amount;
                source.touch();
                store.save_account(&source)?;
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        match store.account(transaction.to_account) {
            Ok(mut destination) => {
                destination.balance -= transaction.amount;
                destination.touch();
                store.save_account(&destination)?;
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        store.delete_transaction(id)?;
        tracing::info!(id = %id, "transaction deleted");
        Ok(transaction)
    }

    /// All transfers, most recent date first.
    pub fn list(store: &dyn Store) -> Result<Vec<Transaction>> {
        let mut transactions = store.transactions()?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }
}

// Compensation is best effort; a failed re-save leaves the ledger
// inconsistent and is only logged.
fn compensate(store: &dyn Store, original: &Account) {
    if let Err(err) = store.save_account(original) {
        tracing::warn!(id = %original.id, %err, "failed to restore account during rollback");
    }
}
