//! tally-finance: text classifier, summary aggregator and the ledger service

pub mod classifier;
pub mod ledger;
pub mod summary;

pub use classifier::{classify, classify_with, Classification, Intent, GENERAL_SAVINGS};
pub use ledger::{Ledger, Recorded};
pub use summary::{summarize, GoalProjection, Summary};
