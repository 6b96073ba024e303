use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use profqc_model::ModelError;

/// Errors raised at the file boundary. A load either yields a consistent
/// table or one of these; it never yields partially parsed QC state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("row {row}: invalid number {value:?} in column {column}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: {source}")]
    InvalidQualityFlag {
        row: usize,
        #[source]
        source: ModelError,
    },

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
