//! tally-store: CSV record store and starter data sets

pub mod csv_store;
pub mod records;
pub mod seed;

pub use csv_store::CsvStore;
pub use seed::{default_budgets, default_goals, reset, seed};
