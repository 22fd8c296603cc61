use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ErrorCode, LedgerError, Result};

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Structural validation applied by the store before any write is
/// accepted. Business rules live in the services, not here.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Inclusive calendar-date range used by history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(LedgerError::validation(
                "range",
                ErrorCode::InvalidDate,
                format!("range end {end} precedes start {start}"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub(crate) fn require_id(id: Uuid, field: &'static str) -> Result<()> {
    if id.is_nil() {
        return Err(LedgerError::required(field));
    }
    Ok(())
}

pub(crate) fn require_text(value: &str, field: &'static str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::required(field));
    }
    if value.chars().count() > max {
        return Err(LedgerError::max_length(field, max));
    }
    Ok(())
}

pub(crate) fn require_positive(amount: i64, field: &'static str) -> Result<()> {
    if amount <= 0 {
        return Err(LedgerError::validation(
            field,
            ErrorCode::InvalidAmount,
            format!("{field} must be a positive integer, got {amount}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(date(2025, 6, 1), date(2025, 5, 1)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDate);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        assert!(range.contains(date(2025, 1, 1)));
        assert!(range.contains(date(2025, 1, 31)));
        assert!(!range.contains(date(2025, 2, 1)));
    }
}
