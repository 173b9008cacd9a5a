//! Aggregation of a transaction history and goal list into a summary with
//! per-goal savings-pace projections.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::{Category, Goal, Transaction};

/// Days in one pay period
pub const BIWEEKLY_DAYS: f64 = 14.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    /// Absolute spend per category; categories with no expenses are absent
    pub category_expenses: BTreeMap<Category, f64>,
    /// Open goals only, in input order
    pub savings_goals: Vec<GoalProjection>,
}

/// Pace needed to hit a goal by its deadline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProjection {
    pub goal: String,
    pub target_amount: f64,
    pub current_amount: f64,
    /// Negative when the goal is over-funded
    pub remaining_amount: f64,
    pub days_remaining: i64,
    pub daily_savings_needed: f64,
    pub biweekly_savings_needed: f64,
}

/// Round to cents from the exact binary value, ties to even.
fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

/// Project one goal. `None` once the deadline is today or already past.
pub fn project_goal(goal: &Goal, today: NaiveDate) -> Option<GoalProjection> {
    let days_remaining = (goal.deadline - today).num_days();
    if days_remaining <= 0 {
        return None;
    }

    let remaining_amount = goal.remaining();
    let daily = remaining_amount / days_remaining as f64;

    Some(GoalProjection {
        goal: goal.name.clone(),
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        remaining_amount,
        days_remaining,
        daily_savings_needed: round2(daily),
        // from the unrounded daily pace
        biweekly_savings_needed: round2(daily * BIWEEKLY_DAYS),
    })
}

/// Summarize `transactions` and `goals` as of `today`.
pub fn summarize(transactions: &[Transaction], goals: &[Goal], today: NaiveDate) -> Summary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut category_expenses: BTreeMap<Category, f64> = BTreeMap::new();

    for txn in transactions {
        if txn.amount > 0.0 {
            total_income += txn.amount;
        } else if txn.amount < 0.0 {
            total_expenses += txn.amount.abs();
            *category_expenses.entry(txn.category).or_insert(0.0) += txn.amount.abs();
        }
    }

    let savings_goals = goals
        .iter()
        .filter_map(|g| project_goal(g, today))
        .collect();

    Summary {
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
        category_expenses,
        savings_goals,
    }
}
