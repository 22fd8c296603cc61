use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{require_id, require_positive, require_text, Identifiable, Validate};
use crate::domain::transaction::MAX_DESCRIPTION_LEN;
use crate::errors::{ErrorCode, LedgerError, Result};

/// A transfer template that, when processed, produces a concrete
/// transaction from its frozen parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringTransaction {
    pub id: Uuid,
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub amount: i64,
    pub description: String,
    pub frequency: Frequency,
    pub status: RecurringStatus,
    /// Advanced to the caller-supplied processing date on each
    /// successful run; the engine never computes calendar due-dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringTransaction {
    pub fn new(
        from_account: Uuid,
        to_account: Uuid,
        amount: i64,
        description: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            from_account,
            to_account,
            amount,
            description: description.into(),
            frequency,
            status: RecurringStatus::Active,
            last_processed: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RecurringStatus::Active
    }

    /// Whether another occurrence is due on `current`. A template that
    /// was never processed is always due; otherwise the whole-day gap
    /// since the last processing must reach the frequency threshold.
    pub fn is_due(&self, current: NaiveDate) -> bool {
        match self.last_processed {
            None => true,
            Some(last) => (current - last).num_days() >= self.frequency.min_gap_days(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for RecurringTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for RecurringTransaction {
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

/// Occurrence cadence. Monthly and yearly thresholds are fixed-day
/// approximations (28 and 365 days), not calendar-boundary arithmetic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Whole-day gap required before another occurrence is due.
    pub fn min_gap_days(self) -> i64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 28,
            Frequency::Yearly => 365,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecurringStatus {
    #[default]
    Active,
    Paused,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn template(frequency: Frequency) -> RecurringTransaction {
        RecurringTransaction::new(Uuid::new_v4(), Uuid::new_v4(), 10_000, "Rent", frequency)
    }

    #[test]
    fn never_processed_template_is_always_due() {
        let rent = template(Frequency::Monthly);
        assert!(rent.is_due(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn due_thresholds_match_frequencies() {
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let cases = [
            (Frequency::Daily, 1),
            (Frequency::Weekly, 7),
            (Frequency::Monthly, 28),
            (Frequency::Yearly, 365),
        ];
        for (frequency, gap) in cases {
            let mut item = template(frequency);
            item.last_processed = Some(anchor);
            assert!(
                !item.is_due(anchor + Duration::days(gap - 1)),
                "{frequency:?} due one day early"
            );
            assert!(
                item.is_due(anchor + Duration::days(gap)),
                "{frequency:?} not due at its threshold"
            );
        }
    }
}
