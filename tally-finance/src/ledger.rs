//! Ledger service: sequences classify → persist → aggregate over a
//! [`RecordStore`].

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::{Budget, ClassifyError, Goal, LedgerError, RecordError, RecordStore, Transaction};
use tracing::{debug, error, info, warn};

use crate::classifier::{classify_with, Classification};
use crate::summary::{summarize, Summary};

/// Outcome of recording one line of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recorded {
    pub transaction: Transaction,
    pub goal_name: Option<String>,
    /// New balance of the goal, when a stored goal was credited
    pub goal_balance: Option<f64>,
}

pub struct Ledger<S> {
    store: S,
}

impl<S: RecordStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify without persisting anything.
    ///
    /// Goals are loaded only for saving text. Goal data that cannot be
    /// loaded then turns into a rejection.
    pub fn preview(&self, text: &str) -> Result<Classification, ClassifyError> {
        classify_with(text, || {
            let goals = self.store.load_goals().map_err(|e| {
                warn!("cannot load goals for classification: {e}");
                ClassifyError::Unprocessable(e.to_string())
            })?;
            Ok(goals.into_iter().map(|g| g.name).collect())
        })
    }

    /// Classify `text`, append it dated `today` and credit the matched goal.
    ///
    /// The append and the goal update are not atomic. A failed goal update
    /// leaves the transaction recorded.
    pub fn record(&self, text: &str, today: NaiveDate) -> Result<Recorded, RecordError> {
        let classification = self.preview(text)?;

        let transaction = Transaction {
            date: today,
            amount: classification.amount,
            category: classification.category,
            description: classification.description,
        };
        self.store.append_transaction(&transaction)?;
        info!(
            amount = transaction.amount,
            category = transaction.category.as_str(),
            "recorded transaction"
        );

        let goal_balance = match classification.goal_name.as_deref() {
            Some(name) => match self.store.update_goal(name, transaction.amount.abs()) {
                Ok(balance) => {
                    info!(goal = name, balance, "credited goal");
                    Some(balance)
                }
                Err(LedgerError::GoalNotFound(_)) => {
                    debug!(goal = name, "no stored goal to credit");
                    None
                }
                Err(e) => {
                    error!(goal = name, "transaction recorded but goal update failed: {e}");
                    return Err(e.into());
                }
            },
            None => None,
        };

        Ok(Recorded {
            transaction,
            goal_name: classification.goal_name,
            goal_balance,
        })
    }

    /// Summary of everything stored, as of `today`.
    pub fn summary(&self, today: NaiveDate) -> Result<Summary, LedgerError> {
        let transactions = self.store.load_transactions()?;
        let goals = self.store.load_goals()?;
        Ok(summarize(&transactions, &goals, today))
    }

    /// Add a signed `delta` to a goal, returning its new balance.
    pub fn update_goal(&self, name: &str, delta: f64) -> Result<f64, LedgerError> {
        let balance = self.store.update_goal(name, delta)?;
        info!(goal = name, delta, balance, "updated goal");
        Ok(balance)
    }

    pub fn goals(&self) -> Result<Vec<Goal>, LedgerError> {
        self.store.load_goals()
    }

    pub fn budgets(&self) -> Result<Vec<Budget>, LedgerError> {
        self.store.load_budgets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GENERAL_SAVINGS;
    use chrono::Duration;
    use tally_core::{Category, MemoryStore};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::new(MemoryStore::with_goals(vec![
            Goal::new("Summer Savings", 3000.0, 0.0, today() + Duration::days(60)),
            Goal::new("Trip", 2000.0, 100.0, today() + Duration::days(30)),
        ]))
    }

    /// Store whose goal file is unreadable
    struct BrokenGoals;

    impl RecordStore for BrokenGoals {
        fn load_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
            Ok(vec![])
        }
        fn append_transaction(&self, _txn: &Transaction) -> Result<(), LedgerError> {
            Ok(())
        }
        fn replace_transactions(&self, _txns: &[Transaction]) -> Result<(), LedgerError> {
            Ok(())
        }
        fn load_goals(&self) -> Result<Vec<Goal>, LedgerError> {
            Err(LedgerError::malformed("goals.csv", 2, "invalid target_amount 'lots'"))
        }
        fn save_goals(&self, _goals: &[Goal]) -> Result<(), LedgerError> {
            Ok(())
        }
        fn load_budgets(&self) -> Result<Vec<Budget>, LedgerError> {
            Ok(vec![])
        }
        fn save_budgets(&self, _budgets: &[Budget]) -> Result<(), LedgerError> {
            Ok(())
        }
    }

    #[test]
    fn test_record_expense() {
        let ledger = ledger();
        let rec = ledger.record("spent $40 on groceries", today()).unwrap();
        assert_eq!(rec.transaction.amount, -40.0);
        assert_eq!(rec.transaction.category, Category::Food);
        assert_eq!(rec.transaction.date, today());
        assert_eq!(rec.goal_balance, None);
        assert_eq!(ledger.store().load_transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_record_saving_credits_goal() {
        let ledger = ledger();
        let rec = ledger.record("put $150 into summer savings", today()).unwrap();
        assert_eq!(rec.goal_name.as_deref(), Some("Summer Savings"));
        assert_eq!(rec.goal_balance, Some(150.0));
        assert_eq!(ledger.goals().unwrap()[0].current_amount, 150.0);
        assert_eq!(
            rec.transaction.description,
            "put $150 into summer savings (Goal: Summer Savings)"
        );
    }

    #[test]
    fn test_general_savings_is_recorded_without_goal_update() {
        let ledger = ledger();
        let before = ledger.goals().unwrap();
        let rec = ledger.record("set aside $20", today()).unwrap();
        assert_eq!(rec.goal_name.as_deref(), Some(GENERAL_SAVINGS));
        assert_eq!(rec.goal_balance, None);
        assert_eq!(ledger.goals().unwrap(), before);
        assert_eq!(ledger.store().load_transactions().unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_text_is_not_stored() {
        let ledger = ledger();
        let err = ledger.record("bought something nice", today()).unwrap_err();
        assert!(matches!(err, RecordError::Rejected(ClassifyError::NoAmountFound)));
        assert!(ledger.store().load_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_goals_reject_saving_input() {
        let ledger = Ledger::new(BrokenGoals);
        let err = ledger.record("saved $5", today()).unwrap_err();
        assert!(matches!(err, RecordError::Rejected(ClassifyError::Unprocessable(_))));
    }

    #[test]
    fn test_unreadable_goals_do_not_block_expenses() {
        let ledger = Ledger::new(BrokenGoals);
        let rec = ledger.record("spent $40 on food", today()).unwrap();
        assert_eq!(rec.transaction.amount, -40.0);
        assert_eq!(rec.goal_name, None);
    }

    #[test]
    fn test_saving_for_trip_is_spent_and_credited() {
        let ledger = ledger();
        let rec = ledger.record("saved $50 for the trip", today()).unwrap();
        assert_eq!(rec.transaction.amount, -50.0);
        assert_eq!(rec.transaction.category, Category::Savings);
        assert_eq!(rec.transaction.description, "saved $50 for the trip (Goal: Trip)");
        assert_eq!(rec.goal_balance, Some(150.0));
        assert_eq!(ledger.goals().unwrap()[1].current_amount, 150.0);
    }

    #[test]
    fn test_update_goal_and_unknown_goal() {
        let ledger = ledger();
        assert_eq!(ledger.update_goal("Trip", 25.0).unwrap(), 125.0);

        let before = ledger.goals().unwrap();
        let err = ledger.update_goal("Boat", 25.0).unwrap_err();
        assert!(matches!(err, LedgerError::GoalNotFound(ref n) if n == "Boat"));
        assert_eq!(ledger.goals().unwrap(), before);
    }

    #[test]
    fn test_summary_after_recording() {
        let ledger = ledger();
        ledger.record("got my paycheck $1000", today()).unwrap();
        ledger.record("spent $200 on groceries", today()).unwrap();
        ledger.record("paid $50 for dinner", today()).unwrap();

        let s = ledger.summary(today()).unwrap();
        assert_eq!(s.total_income, 1000.0);
        assert_eq!(s.total_expenses, 250.0);
        assert_eq!(s.net_balance, 750.0);
        assert_eq!(s.category_expenses[&Category::Food], 250.0);
        assert_eq!(s.savings_goals.len(), 2);
        assert_eq!(s.savings_goals[1].remaining_amount, 1900.0);
    }

    #[test]
    fn test_summary_fails_on_malformed_goals() {
        let ledger = Ledger::new(BrokenGoals);
        assert!(matches!(
            ledger.summary(today()),
            Err(LedgerError::MalformedRecord { .. })
        ));
    }
}
