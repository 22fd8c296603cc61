use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{require_id, require_positive, require_text, Identifiable, Validate};
use crate::errors::{ErrorCode, LedgerError, Result};

/// Upper bound on transfer descriptions, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// An immutable, dated transfer of a fixed amount between two accounts.
/// The money-moving fields are frozen at creation; the only supported
/// amendment is deletion with balance reversal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub from_account: Uuid,
    pub to_account: Uuid,
    /// Minor currency units, always positive.
    pub amount: i64,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        from_account: Uuid,
        to_account: Uuid,
        amount: i64,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_account,
            to_account,
            amount,
            description: description.into(),
            date,
            category: None,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Transaction {
    fn validate(&self) -> Result<()> {
        require_id(self.id, "id")?;
        require_id(self.from_account, "from_account")?;
        require_id(self.to_account, "to_account")?;
        if self.from_account == self.to_account {
            return Err(LedgerError::validation(
                "to_account",
                ErrorCode::SameAccount,
                "source and destination accounts must differ",
            ));
        }
        require_positive(self.amount, "amount")?;
        require_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        Ok(())
    }
}
