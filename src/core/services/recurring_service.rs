//! Recurring transfer engine: a small state machine over templates that
//! materializes concrete transfers through the ledger.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    Frequency, RecurringStatus, RecurringTransaction, Transaction, MAX_DESCRIPTION_LEN,
};
use crate::errors::{ErrorCode, LedgerError, Result};
use crate::store::Store;

use super::{CreateTransaction, TransactionService};

/// Suffix appended to descriptions of transfers spawned from templates.
const RECURRING_SUFFIX: &str = " (Recurring)";

/// Input for creating a transfer template.
#[derive(Debug, Clone)]
pub struct CreateRecurring {
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub amount: i64,
    pub description: String,
    pub frequency: Frequency,
}

impl CreateRecurring {
    pub fn new(
        from_account: Uuid,
        to_account: Uuid,
        amount: i64,
        description: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            from_account,
            to_account,
            amount,
            description: description.into(),
            frequency,
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
        Ok(())
    }
}

/// Partial update of a template; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecurring {
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub status: Option<RecurringStatus>,
    pub last_processed: Option<NaiveDate>,
}

/// Owns the template lifecycle and only ever produces transactions via
/// the ledger, never mutating balances directly.
pub struct RecurringService;

impl RecurringService {
    /// The direction rule is deliberately not checked here; it applies
    /// when the template is processed into a real transfer.
    pub fn create(store: &dyn Store, input: CreateRecurring) -> Result<RecurringTransaction> {
        input.validate()?;
        let template = RecurringTransaction::new(
            input.from_account,
            input.to_account,
            input.amount,
            input.description,
            input.frequency,
        );
        store.save_recurring_transaction(&template)?;
        tracing::info!(id = %template.id, "recurring transfer created");
        Ok(template)
    }

    pub fn update(
        store: &dyn Store,
        id: Uuid,
        changes: UpdateRecurring,
    ) -> Result<RecurringTransaction> {
        let mut template = store.recurring_transaction(id)?;
        if let Some(amount) = changes.amount {
            if amount <= 0 {
                return Err(LedgerError::validation(
                    "amount",
                    ErrorCode::InvalidAmount,
                    format!("amount must be a positive integer, got {amount}"),
                ));
            }
            template.amount = amount;
        }
        if let Some(description) = changes.description {
            if description.trim().is_empty() {
                return Err(LedgerError::required("description"));
            }
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(LedgerError::max_length("description", MAX_DESCRIPTION_LEN));
            }
            template.description = description;
        }
        if let Some(frequency) = changes.frequency {
            template.frequency = frequency;
        }
        if let Some(status) = changes.status {
            template.status = status;
        }
        if let Some(last_processed) = changes.last_processed {
            template.last_processed = Some(last_processed);
        }
        template.touch();
        store.save_recurring_transaction(&template)?;
        Ok(template)
    }

    pub fn pause(store: &dyn Store, id: Uuid) -> Result<RecurringTransaction> {
        let mut template = store.recurring_transaction(id)?;
        if template.status == RecurringStatus::Paused {
            return Err(LedgerError::rule(
                ErrorCode::InvalidStatus,
                format!("recurring transfer `{}` is already paused", template.description),
            ));
        }
        template.status = RecurringStatus::Paused;
        template.touch();
        store.save_recurring_transaction(&template)?;
        tracing::info!(id = %template.id, "recurring transfer paused");
        Ok(template)
    }

    pub fn resume(store: &dyn Store, id: Uuid) -> Result<RecurringTransaction> {
        let mut template = store.recurring_transaction(id)?;
        if template.status == RecurringStatus::Active {
            return Err(LedgerError::rule(
                ErrorCode::InvalidStatus,
                format!("recurring transfer `{}` is not paused", template.description),
            ));
        }
        template.status = RecurringStatus::Active;
        template.touch();
        store.save_recurring_transaction(&template)?;
        tracing::info!(id = %template.id, "recurring transfer resumed");
        Ok(template)
    }

    pub fn delete(store: &dyn Store, id: Uuid) -> Result<()> {
        store.delete_recurring_transaction(id)
    }

    /// Materializes one concrete transfer for `process_date` and
    /// advances the template. Any failure from the underlying transfer
    /// leaves `last_processed` untouched.
    pub fn process(store: &dyn Store, id: Uuid, process_date: NaiveDate) -> Result<Transaction> {
        let mut template = store.recurring_transaction(id)?;
        if !template.is_active() {
            return Err(LedgerError::rule(
                ErrorCode::RecurringPaused,
                format!("recurring transfer `{}` is paused", template.description),
            ));
        }
        let input = CreateTransaction::new(
            template.from_account,
            template.to_account,
            template.amount,
            format!("{}{}", template.description, RECURRING_SUFFIX),
            process_date,
        );
        let transaction = TransactionService::record(store, input)?;

        template.last_processed = Some(process_date);
        template.touch();
        store.save_recurring_transaction(&template)?;
        tracing::info!(id = %template.id, date = %process_date, "recurring transfer processed");
        Ok(transaction)
    }

    /// Pure due-date predicate; mutates nothing.
    pub fn should_process(store: &dyn Store, id: Uuid, current_date: NaiveDate) -> Result<bool> {
        let template = store.recurring_transaction(id)?;
        Ok(template.is_due(current_date))
    }

    /// Ids of active templates due on `current_date`.
    pub fn due(store: &dyn Store, current_date: NaiveDate) -> Result<Vec<Uuid>> {
        Ok(store
            .recurring_transactions()?
            .iter()
            .filter(|template| template.is_active() && template.is_due(current_date))
            .map(|template| template.id)
            .collect())
    }

    pub fn list(store: &dyn Store) -> Result<Vec<RecurringTransaction>> {
        store.recurring_transactions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AccountService, CreateAccount};
    use crate::domain::AccountKind;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn seeded_template(store: &MemoryStore) -> RecurringTransaction {
        let checking = AccountService::create(
            store,
            CreateAccount::new("Checking", AccountKind::Asset).with_balance(500_000),
        )
        .unwrap();
        let rent =
            AccountService::create(store, CreateAccount::new("Rent", AccountKind::Expense))
                .unwrap();
        RecurringService::create(
            store,
            CreateRecurring::new(checking.id, rent.id, 100_000, "Rent", Frequency::Monthly),
        )
        .unwrap()
    }

    #[test]
    fn processing_a_paused_template_is_rejected() {
        let store = MemoryStore::new();
        let template = seeded_template(&store);
        RecurringService::pause(&store, template.id).unwrap();

        let err = RecurringService::process(&store, template.id, today()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecurringPaused);
    }

    #[test]
    fn pausing_twice_is_rejected() {
        let store = MemoryStore::new();
        let template = seeded_template(&store);
        RecurringService::pause(&store, template.id).unwrap();

        let err = RecurringService::pause(&store, template.id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStatus);
    }

    #[test]
    fn resuming_an_active_template_is_rejected() {
        let store = MemoryStore::new();
        let template = seeded_template(&store);

        let err = RecurringService::resume(&store, template.id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStatus);
    }

    #[test]
    fn due_skips_paused_templates() {
        let store = MemoryStore::new();
        let template = seeded_template(&store);
        assert_eq!(RecurringService::due(&store, today()).unwrap(), vec![template.id]);

        RecurringService::pause(&store, template.id).unwrap();
        assert!(RecurringService::due(&store, today()).unwrap().is_empty());
    }

    #[test]
    fn update_validates_provided_fields() {
        let store = MemoryStore::new();
        let template = seeded_template(&store);

        let err = RecurringService::update(
            &store,
            template.id,
            UpdateRecurring {
                amount: Some(0),
                ..UpdateRecurring::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAmount);

        let updated = RecurringService::update(
            &store,
            template.id,
            UpdateRecurring {
                frequency: Some(Frequency::Weekly),
                ..UpdateRecurring::default()
            },
        )
        .unwrap();
        assert_eq!(updated.frequency, Frequency::Weekly);
        assert_eq!(updated.amount, 100_000);
    }
}
