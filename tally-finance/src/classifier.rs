//! Deterministic keyword rules turning free text ("spent $40 on groceries")
//! into a signed amount, a category and an optional goal allocation.
//!
//! No NLP: every decision is a lower-cased substring test against the static
//! tables below, checked in a fixed order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tally_core::{Category, ClassifyError};
use tracing::debug;

/// Goal assigned to saving text that names no known goal
pub const GENERAL_SAVINGS: &str = "General Savings";

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?[0-9]+(?:\.[0-9]{2})?").expect("amount pattern compiles"));

const EXPENSE_KEYWORDS: &[&str] = &[
    "spent", "paid", "cost", "bought", "purchase", "pay for", "charged", "gave", "owe", "due",
    "bill", "rent", "trip", "gift", "date", "shopping", "food", "restaurant", "groceries",
    "subscription", "fee", "ticket", "monthly", "credit", "loan", "withdraw", "transfer to",
    "sent to", "donation", "donated", "contributed", "contribution", "lost", "fine", "penalty",
    "parking", "transport", "bus", "train", "taxi", "uber", "lyft", "gas", "fuel", "movie",
    "theatre", "concert", "game", "entertainment", "store", "mall", "clothes", "clothing",
    "utility", "electricity", "water", "internet", "phone", "housing", "apartment", "house",
];

const INCOME_KEYWORDS: &[&str] = &[
    "salary", "paycheck", "income", "earned", "received", "got paid", "deposit", "deposited",
    "bonus", "refund", "reimbursement", "interest", "dividend", "won", "gifted", "prize",
    "reward", "cashback", "transfer from", "received from", "allowance", "stipend",
    "scholarship", "grant", "loan received", "payment from", "sold", "sale", "profit",
    "commission", "tips", "tip", "wage",
];

const SAVING_KEYWORDS: &[&str] = &[
    "save", "saved", "put in", "put into", "added to", "add to", "deposit to", "deposited to",
    "transfer to savings", "set aside", "set to", "put towards", "put toward", "contribute to",
    "contributed to", "fund", "funded", "saving for", "saving towards", "saving to", "saving",
];

/// Category tables, tested top to bottom; first hit wins.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &["food", "restaurant", "dinner", "lunch", "breakfast", "coffee", "meal", "groceries"],
    ),
    (
        Category::Transportation,
        &["transport", "bus", "train", "taxi", "uber", "lyft", "gas", "fuel"],
    ),
    (
        Category::Entertainment,
        &["movie", "theatre", "concert", "game", "entertainment"],
    ),
    (
        Category::Shopping,
        &["shopping", "store", "mall", "clothes", "clothing"],
    ),
    (
        Category::Bills,
        &["bill", "utility", "electricity", "water", "internet", "phone", "subscription", "fee"],
    ),
    (Category::Rent, &["rent", "housing", "apartment", "house"]),
    (
        Category::Income,
        &[
            "salary", "paycheck", "income", "earned", "received", "deposit", "bonus", "refund",
            "reimbursement", "interest", "dividend", "won", "gifted", "prize", "reward",
            "cashback", "allowance", "stipend", "scholarship", "grant", "loan received",
            "payment from", "sold", "sale", "profit", "commission", "tips", "tip", "wage",
        ],
    ),
    (Category::Savings, SAVING_KEYWORDS),
];

/// What the text says the money is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Expense,
    Income,
    Saving,
}

impl Intent {
    /// Keyword-based intent of already lower-cased text.
    ///
    /// Precedence: expense, then income, then saving. `None` when no table
    /// matches; callers treat that as an expense.
    pub fn detect(lower: &str) -> Option<Intent> {
        if contains_any(lower, EXPENSE_KEYWORDS) {
            Some(Intent::Expense)
        } else if contains_any(lower, INCOME_KEYWORDS) {
            Some(Intent::Income)
        } else if contains_any(lower, SAVING_KEYWORDS) {
            Some(Intent::Saving)
        } else {
            None
        }
    }

    /// Apply this intent's sign to a magnitude
    pub fn signed(&self, magnitude: f64) -> f64 {
        match self {
            Intent::Expense => -magnitude.abs(),
            Intent::Income | Intent::Saving => magnitude.abs(),
        }
    }
}

/// Structured reading of one line of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    /// Set only for saving text
    pub goal_name: Option<String>,
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

/// First `$12` / `12.50` style quantity in the text, without the `$`.
pub fn extract_amount(text: &str) -> Result<f64, ClassifyError> {
    let m = AMOUNT_RE.find(text).ok_or(ClassifyError::NoAmountFound)?;
    let value = m
        .as_str()
        .trim_start_matches('$')
        .parse::<f64>()
        .map_err(|e| ClassifyError::Unprocessable(format!("amount '{}': {e}", m.as_str())))?;
    if !value.is_finite() {
        return Err(ClassifyError::Unprocessable(format!(
            "amount '{}' is out of range",
            m.as_str()
        )));
    }
    Ok(value)
}

/// Whether any saving keyword appears in already lower-cased text.
///
/// Independent of [`Intent::detect`]: saving text that also reads as an
/// expense keeps the expense sign but is still allocated to a goal.
pub fn is_saving(lower: &str) -> bool {
    contains_any(lower, SAVING_KEYWORDS)
}

/// Category from the ordered keyword tables, `Other` when nothing matches
pub fn categorize(lower: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// First known goal whose name appears in the text, case-insensitively.
/// Goal order is the caller's.
pub fn resolve_goal<S: AsRef<str>>(lower: &str, goal_names: &[S]) -> String {
    goal_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.trim().is_empty())
        .find(|name| lower.contains(&name.to_lowercase()))
        .unwrap_or(GENERAL_SAVINGS)
        .to_string()
}

/// Classify free text against the known goal names.
pub fn classify<S: AsRef<str>>(text: &str, goal_names: &[S]) -> Result<Classification, ClassifyError> {
    classify_with(text, || {
        Ok(goal_names.iter().map(|n| n.as_ref().to_string()).collect())
    })
}

/// Like [`classify`], but goal names are fetched only for saving text.
pub fn classify_with<F>(text: &str, goal_names: F) -> Result<Classification, ClassifyError>
where
    F: FnOnce() -> Result<Vec<String>, ClassifyError>,
{
    let magnitude = extract_amount(text)?;
    let lower = text.to_lowercase();

    let detected = Intent::detect(&lower);
    // Nothing matched: treat as an expense.
    let intent = detected.unwrap_or(Intent::Expense);

    let mut category = categorize(&lower);
    let mut description = text.to_string();
    let mut goal_name = None;

    if is_saving(&lower) {
        let names = goal_names()?;
        let goal = resolve_goal(&lower, names.as_slice());
        category = Category::Savings;
        description = format!("{text} (Goal: {goal})");
        goal_name = Some(goal);
    }

    let amount = intent.signed(magnitude);
    debug!(
        ?detected,
        amount,
        category = category.as_str(),
        goal = goal_name.as_deref().unwrap_or("-"),
        "classified input"
    );

    Ok(Classification {
        amount,
        category,
        description,
        goal_name,
    })
}
