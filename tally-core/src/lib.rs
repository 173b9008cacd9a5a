//! tally-core: record types, error taxonomy and the storage seam for Tally

pub mod error;
pub mod finance;
pub mod store;
pub mod time;

pub use error::{ClassifyError, LedgerError, RecordError};
pub use finance::{apply_goal_delta, Budget, BudgetPeriod, Category, Goal, Transaction};
pub use store::{MemoryStore, RecordStore};
