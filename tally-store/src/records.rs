//! Flat CSV row shapes and their conversion to/from core records.
//!
//! Every field is read as text first so that a bad value can be reported
//! with its column instead of as an opaque deserialization failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::time::{parse_iso_date, ISO_DATE};
use tally_core::{Budget, BudgetPeriod, Goal, Transaction};

pub const TRANSACTION_HEADER: [&str; 4] = ["date", "amount", "category", "description"];
pub const GOAL_HEADER: [&str; 4] = ["goal", "target_amount", "current_amount", "deadline"];
pub const BUDGET_HEADER: [&str; 3] = ["category", "amount", "period"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRow {
    pub goal: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRow {
    pub category: String,
    pub amount: String,
    pub period: String,
}

fn parse_amount(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid {field} '{raw}'"))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date(raw).map_err(|_| format!("invalid {field} '{raw}'"))
}

fn format_date(d: NaiveDate) -> String {
    d.format(ISO_DATE).to_string()
}

impl TransactionRow {
    pub fn into_record(self) -> Result<Transaction, String> {
        Ok(Transaction {
            date: parse_date("date", &self.date)?,
            amount: parse_amount("amount", &self.amount)?,
            category: self.category.parse()?,
            description: self.description,
        })
    }
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            date: format_date(t.date),
            amount: t.amount.to_string(),
            category: t.category.to_string(),
            description: t.description.clone(),
        }
    }
}

impl GoalRow {
    pub fn into_record(self) -> Result<Goal, String> {
        let name = self.goal.trim();
        if name.is_empty() {
            return Err("empty goal name".to_string());
        }
        Ok(Goal {
            name: name.to_string(),
            target_amount: parse_amount("target_amount", &self.target_amount)?,
            current_amount: parse_amount("current_amount", &self.current_amount)?,
            deadline: parse_date("deadline", &self.deadline)?,
        })
    }
}

impl From<&Goal> for GoalRow {
    fn from(g: &Goal) -> Self {
        Self {
            goal: g.name.clone(),
            target_amount: g.target_amount.to_string(),
            current_amount: g.current_amount.to_string(),
            deadline: format_date(g.deadline),
        }
    }
}

impl BudgetRow {
    pub fn into_record(self) -> Result<Budget, String> {
        let period: BudgetPeriod = self.period.parse()?;
        Ok(Budget {
            category: self.category.trim().to_string(),
            amount: parse_amount("amount", &self.amount)?,
            period,
        })
    }
}

impl From<&Budget> for BudgetRow {
    fn from(b: &Budget) -> Self {
        Self {
            category: b.category.clone(),
            amount: b.amount.to_string(),
            period: b.period.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Category;

    #[test]
    fn test_transaction_row_parses() {
        let row = TransactionRow {
            date: "2026-03-02".into(),
            amount: "-42.5".into(),
            category: "Food".into(),
            description: "spent $42.50 on food".into(),
        };
        let t = row.into_record().unwrap();
        assert_eq!(t.amount, -42.5);
        assert_eq!(t.category, Category::Food);
    }

    #[test]
    fn test_transaction_row_rejects_non_numeric_amount() {
        let row = TransactionRow {
            date: "2026-03-02".into(),
            amount: "forty".into(),
            category: "Food".into(),
            description: "x".into(),
        };
        assert_eq!(row.into_record().unwrap_err(), "invalid amount 'forty'");
    }

    #[test]
    fn test_goal_row_rejects_bad_deadline() {
        let row = GoalRow {
            goal: "Trip".into(),
            target_amount: "2000".into(),
            current_amount: "0".into(),
            deadline: "08/22/2024".into(),
        };
        assert_eq!(row.into_record().unwrap_err(), "invalid deadline '08/22/2024'");
    }

    #[test]
    fn test_goal_row_rejects_empty_name() {
        let row = GoalRow {
            goal: "  ".into(),
            target_amount: "2000".into(),
            current_amount: "0".into(),
            deadline: "2024-08-22".into(),
        };
        assert!(row.into_record().is_err());
    }

    #[test]
    fn test_amount_formatting_is_compact() {
        let g = Goal::new("Trip", 2000.0, 12.5, NaiveDate::from_ymd_opt(2024, 8, 22).unwrap());
        let row = GoalRow::from(&g);
        assert_eq!(row.target_amount, "2000");
        assert_eq!(row.current_amount, "12.5");
        assert_eq!(row.deadline, "2024-08-22");
    }
}
