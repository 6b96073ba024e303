use thiserror::Error;

/// Errors from the automatic QC pass and its configuration.
///
/// Manual override and feedback merge never fail: unmatched or unparseable
/// rows are counted in their outcomes instead.
#[derive(Debug, Error)]
pub enum QcError {
    #[error("automatic check {check} failed: {message}")]
    CheckFailed { check: String, message: String },

    #[error("automatic check {check} returned {actual} flags for {expected} rows")]
    OutputLength {
        check: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {index} is out of range for a table of {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },

    #[error("invalid QC configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QcError>;
