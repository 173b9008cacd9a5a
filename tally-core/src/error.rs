//! Error taxonomy shared by the classifier, the ledger and the stores.

use thiserror::Error;

/// Rejections from the text classifier. Always recoverable, per request.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// No numeric quantity was found in the input text
    #[error("no amount found in input")]
    NoAmountFound,

    /// Anything else that stopped the input from being processed
    #[error("could not process input: {0}")]
    Unprocessable(String),
}

/// Failures from the ledger and the record stores behind it
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("goal not found: {0}")]
    GoalNotFound(String),

    /// Stored data violates the record schema. Fatal for the request.
    #[error("malformed record in {file} line {line}: {reason}")]
    MalformedRecord {
        file: String,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn malformed(file: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        LedgerError::MalformedRecord {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Error from recording a transaction: either the text was rejected or the
/// store failed.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Rejected(#[from] ClassifyError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = LedgerError::malformed("goals.csv", 3, "invalid deadline 'soon'");
        assert_eq!(
            err.to_string(),
            "malformed record in goals.csv line 3: invalid deadline 'soon'"
        );
    }

    #[test]
    fn test_record_error_wraps_rejection() {
        let err: RecordError = ClassifyError::NoAmountFound.into();
        assert!(matches!(err, RecordError::Rejected(ClassifyError::NoAmountFound)));
        assert_eq!(err.to_string(), "no amount found in input");
    }
}
