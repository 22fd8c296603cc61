pub mod account;
pub mod common;
pub mod recurring;
pub mod snapshot;
pub mod transaction;

pub use account::{Account, AccountKind, AccountStatus, MAX_NAME_LEN};
pub use common::{DateRange, Identifiable, Validate};
pub use recurring::{Frequency, RecurringStatus, RecurringTransaction};
pub use snapshot::NetWorthSnapshot;
pub use transaction::{Transaction, MAX_DESCRIPTION_LEN};
