//! Finance record types: transactions, savings goals and budgets

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// A single logged transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Date the transaction was logged (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Positive = income or saving, negative = expense
    pub amount: f64,
    pub category: Category,
    /// Original text, possibly annotated with a goal reference
    pub description: String,
}

/// Reporting categories. Exactly one per transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    Rent,
    Income,
    Savings,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Rent,
        Category::Income,
        Category::Savings,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Rent => "Rent",
            Category::Income => "Income",
            Category::Savings => "Savings",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A named savings target with a funding deadline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Unique identifier
    pub name: String,
    pub target_amount: f64,
    /// Running balance, grows through saving allocations
    pub current_amount: f64,
    pub deadline: NaiveDate,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_amount: f64,
        current_amount: f64,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount,
            deadline,
        }
    }

    /// Amount still missing to reach the target (negative when over-funded)
    pub fn remaining(&self) -> f64 {
        self.target_amount - self.current_amount
    }
}

/// Apply a signed delta to the goal named `name`, returning its new balance.
///
/// Names match exactly. Nothing changes when the name is unknown.
pub fn apply_goal_delta(goals: &mut [Goal], name: &str, delta: f64) -> Result<f64, LedgerError> {
    let goal = goals
        .iter_mut()
        .find(|g| g.name == name)
        .ok_or_else(|| LedgerError::GoalNotFound(name.to_string()))?;
    goal.current_amount += delta;
    Ok(goal.current_amount)
}

/// Spending allowance for a category over a pay period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    /// Free-form label; budgets may cover things that are not a `Category`
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount: f64, period: BudgetPeriod) -> Self {
        Self {
            category: category.into(),
            amount,
            period,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetPeriod {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "biweekly")]
    Biweekly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Biweekly => "biweekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "biweekly" => Ok(BudgetPeriod::Biweekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            other => Err(format!("unknown budget period '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_as_name() {
        let json = serde_json::to_string(&Category::Transportation).unwrap();
        assert_eq!(json, "\"Transportation\"");
    }

    #[test]
    fn test_apply_goal_delta() {
        let mut goals = vec![
            Goal::new("Trip", 2000.0, 100.0, date(2026, 8, 22)),
            Goal::new("Gifts", 1000.0, 0.0, date(2026, 8, 22)),
        ];
        let updated = apply_goal_delta(&mut goals, "Trip", 50.0).unwrap();
        assert_eq!(updated, 150.0);
        assert_eq!(goals[0].current_amount, 150.0);
        assert_eq!(goals[1].current_amount, 0.0);
    }

    #[test]
    fn test_apply_goal_delta_unknown_goal() {
        let mut goals = vec![Goal::new("Trip", 2000.0, 100.0, date(2026, 8, 22))];
        let before = goals.clone();
        let err = apply_goal_delta(&mut goals, "trip", 50.0).unwrap_err();
        assert!(matches!(err, LedgerError::GoalNotFound(ref n) if n == "trip"));
        assert_eq!(goals, before);
    }

    #[test]
    fn test_goal_remaining_can_go_negative() {
        let goal = Goal::new("Gifts", 1000.0, 1200.0, date(2026, 1, 1));
        assert_eq!(goal.remaining(), -200.0);
    }

    #[test]
    fn test_budget_period_parse() {
        assert_eq!("Biweekly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Biweekly);
        assert_eq!(" monthly ".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert!("yearly".parse::<BudgetPeriod>().is_err());
    }
}
