//! Starter data sets: `seed` for a first run, `reset` to wipe history.

use chrono::NaiveDate;
use tracing::info;

use tally_core::{Budget, BudgetPeriod, Category, Goal, LedgerError, RecordStore, Transaction};

/// Opening balance recorded by `seed` (one biweekly paycheck)
pub const OPENING_PAYCHECK: f64 = 1494.0;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Default savings goals. `deadline` replaces every goal's built-in deadline.
pub fn default_goals(deadline: Option<NaiveDate>) -> Vec<Goal> {
    let summer = ymd(2024, 8, 22);
    let dates = ymd(2024, 5, 23);
    [
        ("Summer Savings", 3000.0, summer),
        ("Trip", 2000.0, summer),
        ("Gifts", 1000.0, summer),
        // 200 a month for a year
        ("Monthly Dates", 2400.0, dates),
    ]
    .into_iter()
    .map(|(name, target, d)| Goal::new(name, target, 0.0, deadline.unwrap_or(d)))
    .collect()
}

/// Default per-pay-period budgets
pub fn default_budgets() -> Vec<Budget> {
    vec![
        Budget::new("Rent", 500.0, BudgetPeriod::Biweekly),
        Budget::new("Dates", 200.0, BudgetPeriod::Monthly),
        Budget::new("Food", 0.0, BudgetPeriod::Biweekly),
        Budget::new("Other", 0.0, BudgetPeriod::Biweekly),
    ]
}

/// Write default goals and budgets plus an opening paycheck dated `today`.
pub fn seed<S: RecordStore + ?Sized>(
    store: &S,
    today: NaiveDate,
    deadline: Option<NaiveDate>,
) -> Result<(), LedgerError> {
    store.save_goals(&default_goals(deadline))?;
    store.save_budgets(&default_budgets())?;
    store.replace_transactions(&[Transaction {
        date: today,
        amount: OPENING_PAYCHECK,
        category: Category::Income,
        description: "First paycheck".to_string(),
    }])?;
    info!("seeded store with default goals, budgets and opening paycheck");
    Ok(())
}

/// Empty the transaction history and restore default goals and budgets.
pub fn reset<S: RecordStore + ?Sized>(store: &S, deadline: Option<NaiveDate>) -> Result<(), LedgerError> {
    store.replace_transactions(&[])?;
    store.save_goals(&default_goals(deadline))?;
    store.save_budgets(&default_budgets())?;
    info!("reset store to initial state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::MemoryStore;

    #[test]
    fn test_default_goals() {
        let goals = default_goals(None);
        let names: Vec<&str> = goals.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Summer Savings", "Trip", "Gifts", "Monthly Dates"]);
        assert!(goals.iter().all(|g| g.current_amount == 0.0));
        assert_eq!(goals[3].deadline, ymd(2024, 5, 23));
    }

    #[test]
    fn test_deadline_override() {
        let d = ymd(2027, 1, 1);
        assert!(default_goals(Some(d)).iter().all(|g| g.deadline == d));
    }

    #[test]
    fn test_seed_writes_opening_paycheck() {
        let store = MemoryStore::new();
        let today = ymd(2026, 10, 19);
        seed(&store, today, None).unwrap();

        let txns = store.load_transactions().unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, today);
        assert_eq!(txns[0].amount, OPENING_PAYCHECK);
        assert_eq!(txns[0].category, Category::Income);
        assert_eq!(store.load_budgets().unwrap().len(), 4);
    }

    #[test]
    fn test_reset_clears_history() {
        let store = MemoryStore::new();
        seed(&store, ymd(2026, 10, 19), None).unwrap();
        store.update_goal("Trip", 300.0).unwrap();

        reset(&store, None).unwrap();
        assert!(store.load_transactions().unwrap().is_empty());
        assert!(store.load_goals().unwrap().iter().all(|g| g.current_amount == 0.0));
    }
}
