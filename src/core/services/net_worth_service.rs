//! Read-only aggregation over the account registry, plus snapshot
//! persistence and history queries.

use chrono::NaiveDate;

use crate::domain::{AccountKind, DateRange, NetWorthSnapshot};
use crate::errors::Result;
use crate::store::Store;

/// Aggregated view over active asset and liability accounts. Income and
/// expense balances never contribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetWorthSummary {
    pub total_assets: i64,
    pub total_liabilities: i64,
    pub net_worth: i64,
    pub asset_accounts: usize,
    pub liability_accounts: usize,
}

pub struct NetWorthService;

impl NetWorthService {
    pub fn calculate(store: &dyn Store) -> Result<NetWorthSummary> {
        let mut summary = NetWorthSummary {
            total_assets: 0,
            total_liabilities: 0,
            net_worth: 0,
            asset_accounts: 0,
            liability_accounts: 0,
        };
        for account in store.accounts()?.iter().filter(|account| account.is_active()) {
            match account.kind {
                AccountKind::Asset => {
                    summary.total_assets += account.balance;
                    summary.asset_accounts += 1;
                }
                AccountKind::Liability => {
                    summary.total_liabilities += account.balance;
                    summary.liability_accounts += 1;
                }
                AccountKind::Income | AccountKind::Expense => {}
            }
        }
        summary.net_worth = summary.total_assets - summary.total_liabilities;
        Ok(summary)
    }

    /// Computes and persists a snapshot for `date`. Snapshots are never
    /// deduplicated; calling twice for the same date stores two.
    pub fn create_snapshot(store: &dyn Store, date: NaiveDate) -> Result<NetWorthSnapshot> {
        let summary = Self::calculate(store)?;
        let snapshot =
            NetWorthSnapshot::new(date, summary.total_assets, summary.total_liabilities);
        store.save_net_worth_snapshot(&snapshot)?;
        tracing::info!(id = %snapshot.id, net_worth = snapshot.net_worth, "net worth snapshot stored");
        Ok(snapshot)
    }

    /// Snapshot history, optionally narrowed to an inclusive range,
    /// ascending by date.
    pub fn history(store: &dyn Store, range: Option<DateRange>) -> Result<Vec<NetWorthSnapshot>> {
        let mut snapshots = store.net_worth_snapshots()?;
        if let Some(range) = range {
            snapshots.retain(|snapshot| range.contains(snapshot.date));
        }
        snapshots.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AccountService, CreateAccount, UpdateAccount};
    use crate::domain::AccountStatus;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        AccountService::create(
            &store,
            CreateAccount::new("Checking", AccountKind::Asset).with_balance(800_000),
        )
        .unwrap();
        AccountService::create(
            &store,
            CreateAccount::new("Mortgage", AccountKind::Liability).with_balance(500_000),
        )
        .unwrap();
        AccountService::create(
            &store,
            CreateAccount::new("Salary", AccountKind::Income).with_balance(-900_000),
        )
        .unwrap();
        AccountService::create(
            &store,
            CreateAccount::new("Groceries", AccountKind::Expense).with_balance(100_000),
        )
        .unwrap();
        store
    }

    #[test]
    fn income_and_expense_balances_are_excluded() {
        let store = seeded_store();
        let summary = NetWorthService::calculate(&store).unwrap();
        assert_eq!(summary.total_assets, 800_000);
        assert_eq!(summary.total_liabilities, 500_000);
        assert_eq!(summary.net_worth, 300_000);
        assert_eq!(summary.asset_accounts, 1);
        assert_eq!(summary.liability_accounts, 1);
    }

    #[test]
    fn archived_accounts_are_excluded() {
        let store = seeded_store();
        let savings = AccountService::create(
            &store,
            CreateAccount::new("Savings", AccountKind::Asset).with_balance(250_000),
        )
        .unwrap();
        assert_eq!(NetWorthService::calculate(&store).unwrap().total_assets, 1_050_000);

        AccountService::update(
            &store,
            savings.id,
            UpdateAccount {
                status: Some(AccountStatus::Archived),
                ..UpdateAccount::default()
            },
        )
        .unwrap();
        assert_eq!(NetWorthService::calculate(&store).unwrap().total_assets, 800_000);
    }

    #[test]
    fn snapshots_for_the_same_date_are_not_deduplicated() {
        let store = seeded_store();
        let day = date(2025, 5, 1);
        NetWorthService::create_snapshot(&store, day).unwrap();
        NetWorthService::create_snapshot(&store, day).unwrap();
        assert_eq!(NetWorthService::history(&store, None).unwrap().len(), 2);
    }

    #[test]
    fn history_filters_to_the_inclusive_range_ascending() {
        let store = seeded_store();
        for day in [date(2025, 1, 15), date(2025, 3, 15), date(2025, 2, 15)] {
            NetWorthService::create_snapshot(&store, day).unwrap();
        }

        let range = DateRange::new(date(2025, 1, 15), date(2025, 2, 28)).unwrap();
        let history = NetWorthService::history(&store, Some(range)).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, date(2025, 1, 15));
        assert_eq!(history[1].date, date(2025, 2, 15));
    }
}
