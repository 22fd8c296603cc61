use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{require_id, Identifiable, Validate};
use crate::errors::{ErrorCode, LedgerError, Result};

/// Point-in-time net-worth reading. Snapshots are immutable once written
/// and are not deduplicated by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetWorthSnapshot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub total_assets: i64,
    pub total_liabilities: i64,
    pub net_worth: i64,
    pub created_at: DateTime<Utc>,
}

impl NetWorthSnapshot {
    pub fn new(date: NaiveDate, total_assets: i64, total_liabilities: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for NetWorthSnapshot {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for NetWorthSnapshot {
    fn validate(&self) -> Result<()> {
        require_id(self.id, "id")?;
        if self.net_worth != self.total_assets - self.total_liabilities {
            return Err(LedgerError::validation(
                "net_worth",
                ErrorCode::InvalidAmount,
                "net worth must equal assets minus liabilities",
            ));
        }
        Ok(())
    }
}
