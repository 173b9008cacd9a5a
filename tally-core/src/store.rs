//! Record store abstraction.
//!
//! The ledger only talks to storage through [`RecordStore`], so the decision
//! logic stays independent of any file format. [`MemoryStore`] is the
//! in-process implementation used by tests and dry runs; the CSV-backed one
//! lives in `tally-store`.

use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

use crate::error::LedgerError;
use crate::finance::{apply_goal_delta, Budget, Goal, Transaction};

/// Load-all / append / update-by-key access over the three record types.
///
/// Implementations are not required to make "append transaction" and
/// "update goal" atomic as a pair. Callers serialize access.
pub trait RecordStore: Send + Sync {
    fn load_transactions(&self) -> Result<Vec<Transaction>, LedgerError>;

    fn append_transaction(&self, txn: &Transaction) -> Result<(), LedgerError>;

    /// Overwrite the whole transaction history (used by reset/seed)
    fn replace_transactions(&self, txns: &[Transaction]) -> Result<(), LedgerError>;

    fn load_goals(&self) -> Result<Vec<Goal>, LedgerError>;

    fn save_goals(&self, goals: &[Goal]) -> Result<(), LedgerError>;

    fn load_budgets(&self) -> Result<Vec<Budget>, LedgerError>;

    fn save_budgets(&self, budgets: &[Budget]) -> Result<(), LedgerError>;

    /// Read-modify-write of a single goal. Returns the new `current_amount`.
    fn update_goal(&self, name: &str, delta: f64) -> Result<f64, LedgerError> {
        let mut goals = self.load_goals()?;
        let updated = apply_goal_delta(&mut goals, name, delta)?;
        self.save_goals(&goals)?;
        Ok(updated)
    }
}

#[derive(Debug, Default)]
struct MemoryData {
    transactions: Vec<Transaction>,
    goals: Vec<Goal>,
    budgets: Vec<Budget>,
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_goals(goals: Vec<Goal>) -> Self {
        Self {
            data: Mutex::new(MemoryData {
                goals,
                ..MemoryData::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryData>, LedgerError> {
        self.data
            .lock()
            .map_err(|_| LedgerError::Storage(anyhow!("memory store lock poisoned")))
    }
}

impl RecordStore for MemoryStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.lock()?.transactions.clone())
    }

    fn append_transaction(&self, txn: &Transaction) -> Result<(), LedgerError> {
        self.lock()?.transactions.push(txn.clone());
        Ok(())
    }

    fn replace_transactions(&self, txns: &[Transaction]) -> Result<(), LedgerError> {
        self.lock()?.transactions = txns.to_vec();
        Ok(())
    }

    fn load_goals(&self) -> Result<Vec<Goal>, LedgerError> {
        Ok(self.lock()?.goals.clone())
    }

    fn save_goals(&self, goals: &[Goal]) -> Result<(), LedgerError> {
        self.lock()?.goals = goals.to_vec();
        Ok(())
    }

    fn load_budgets(&self) -> Result<Vec<Budget>, LedgerError> {
        Ok(self.lock()?.budgets.clone())
    }

    fn save_budgets(&self, budgets: &[Budget]) -> Result<(), LedgerError> {
        self.lock()?.budgets = budgets.to_vec();
        Ok(())
    }

    // Single lock for the whole read-modify-write.
    fn update_goal(&self, name: &str, delta: f64) -> Result<f64, LedgerError> {
        let mut data = self.lock()?;
        apply_goal_delta(&mut data.goals, name, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::Category;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let store = MemoryStore::new();
        for (i, amount) in [10.0, -20.0, 30.0].into_iter().enumerate() {
            store
                .append_transaction(&Transaction {
                    date: date(2026, 3, 1 + i as u32),
                    amount,
                    category: Category::Other,
                    description: format!("txn {i}"),
                })
                .unwrap();
        }
        let amounts: Vec<f64> = store
            .load_transactions()
            .unwrap()
            .iter()
            .map(|t| t.amount)
            .collect();
        assert_eq!(amounts, vec![10.0, -20.0, 30.0]);
    }

    #[test]
    fn test_update_goal() {
        let store = MemoryStore::with_goals(vec![Goal::new("Trip", 2000.0, 0.0, date(2026, 8, 22))]);
        assert_eq!(store.update_goal("Trip", 125.5).unwrap(), 125.5);
        assert_eq!(store.load_goals().unwrap()[0].current_amount, 125.5);
    }

    #[test]
    fn test_update_unknown_goal_leaves_goals_unchanged() {
        let goals = vec![Goal::new("Trip", 2000.0, 10.0, date(2026, 8, 22))];
        let store = MemoryStore::with_goals(goals.clone());
        let err = store.update_goal("Vacation", 5.0).unwrap_err();
        assert!(matches!(err, LedgerError::GoalNotFound(_)));
        assert_eq!(store.load_goals().unwrap(), goals);
    }
}
