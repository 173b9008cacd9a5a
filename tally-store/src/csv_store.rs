//! CSV-backed record store.
//!
//! Layout of the data directory:
//!
//! ```text
//! data/
//! ├── transactions.csv   date,amount,category,description
//! ├── goals.csv          goal,target_amount,current_amount,deadline
//! └── budget.csv         category,amount,period
//! ```
//!
//! Transactions are appended one row at a time. Goals and budgets are
//! rewritten whole through a temp file + rename.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use tally_core::{Budget, Goal, LedgerError, RecordStore, Transaction};

use crate::records::{
    BudgetRow, GoalRow, TransactionRow, BUDGET_HEADER, GOAL_HEADER, TRANSACTION_HEADER,
};

pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const GOALS_FILE: &str = "goals.csv";
pub const BUDGET_FILE: &str = "budget.csv";

#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Open a store rooted at `dir`, creating the directory and any missing
    /// CSV files (header only).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

        let store = Self { dir };
        store.ensure_file(TRANSACTIONS_FILE, &TRANSACTION_HEADER)?;
        store.ensure_file(GOALS_FILE, &GOAL_HEADER)?;
        store.ensure_file(BUDGET_FILE, &BUDGET_HEADER)?;
        Ok(store)
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn ensure_file(&self, file: &str, header: &[&str]) -> Result<(), LedgerError> {
        let path = self.path(file);
        if path.exists() {
            return Ok(());
        }
        write_rows::<TransactionRow>(&path, header, &[])?;
        info!("created {}", path.display());
        Ok(())
    }

    fn load<R, T>(&self, file: &str, convert: impl Fn(R) -> Result<T, String>) -> Result<Vec<T>, LedgerError>
    where
        R: DeserializeOwned,
    {
        let path = self.path(file);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;

        let headers = rdr
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .clone();

        let mut out = Vec::new();
        let mut record = csv::StringRecord::new();
        loop {
            let more = rdr.read_record(&mut record).map_err(|e| {
                let line = e.position().map_or(0, |p| p.line() as usize);
                LedgerError::malformed(file, line, e.to_string())
            })?;
            if !more {
                break;
            }
            // line the record starts on; quoted fields may span several
            let line = record.position().map_or(0, |p| p.line() as usize);
            let row: R = record
                .deserialize(Some(&headers))
                .map_err(|e| LedgerError::malformed(file, line, e.to_string()))?;
            let parsed = convert(row).map_err(|reason| LedgerError::malformed(file, line, reason))?;
            out.push(parsed);
        }
        debug!("loaded {} rows from {}", out.len(), path.display());
        Ok(out)
    }
}

fn write_rows<R: Serialize>(path: &Path, header: &[&str], rows: &[R]) -> Result<(), LedgerError> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp)
            .with_context(|| format!("write {}", tmp.display()))?;
        wtr.write_record(header).context("write csv header")?;
        for row in rows {
            wtr.serialize(row).context("write csv row")?;
        }
        wtr.flush().with_context(|| format!("flush {}", tmp.display()))?;
    }
    fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

impl RecordStore for CsvStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        self.load(TRANSACTIONS_FILE, TransactionRow::into_record)
    }

    fn append_transaction(&self, txn: &Transaction) -> Result<(), LedgerError> {
        let path = self.path(TRANSACTIONS_FILE);
        if !path.exists() {
            self.ensure_file(TRANSACTIONS_FILE, &TRANSACTION_HEADER)?;
        }
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .with_context(|| format!("open {} for append", path.display()))?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.serialize(TransactionRow::from(txn))
            .context("append transaction row")?;
        wtr.flush().with_context(|| format!("flush {}", path.display()))?;
        Ok(())
    }

    fn replace_transactions(&self, txns: &[Transaction]) -> Result<(), LedgerError> {
        let rows: Vec<TransactionRow> = txns.iter().map(TransactionRow::from).collect();
        write_rows(&self.path(TRANSACTIONS_FILE), &TRANSACTION_HEADER, &rows)
    }

    fn load_goals(&self) -> Result<Vec<Goal>, LedgerError> {
        self.load(GOALS_FILE, GoalRow::into_record)
    }

    fn save_goals(&self, goals: &[Goal]) -> Result<(), LedgerError> {
        let rows: Vec<GoalRow> = goals.iter().map(GoalRow::from).collect();
        write_rows(&self.path(GOALS_FILE), &GOAL_HEADER, &rows)
    }

    fn load_budgets(&self) -> Result<Vec<Budget>, LedgerError> {
        self.load(BUDGET_FILE, BudgetRow::into_record)
    }

    fn save_budgets(&self, budgets: &[Budget]) -> Result<(), LedgerError> {
        let rows: Vec<BudgetRow> = budgets.iter().map(BudgetRow::from).collect();
        write_rows(&self.path(BUDGET_FILE), &BUDGET_HEADER, &rows)
    }
}
