use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{require_id, require_text, Identifiable, Validate};
use crate::errors::Result;

/// Upper bound on account names, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A named bucket of money whose kind determines its role in transfers
/// and in net-worth aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// Display grouping only; never load-bearing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_account: Option<Uuid>,
    /// Minor currency units. Maintained incrementally by the ledger,
    /// never recomputed from history.
    pub balance: i64,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountKind, balance: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            parent_account: None,
            balance,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Account {
    fn validate(&self) -> Result<()> {
        require_id(self.id, "id")?;
        require_text(&self.name, "name", MAX_NAME_LEN)?;
        Ok(())
    }
}

/// Enumerates the supported account classifications. Immutable once an
/// account is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Asset,
    Liability,
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Archived,
}
