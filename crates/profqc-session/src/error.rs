use thiserror::Error;

use profqc_validate::QcError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown visit: {0}")]
    UnknownVisit(String),

    #[error("no visit is selected")]
    NoCurrentVisit,

    #[error("row {index} is outside the table")]
    RowOutOfRange { index: usize },

    #[error("row {index} is not a {parameter} value of visit {visit_key}")]
    ForeignRow {
        index: usize,
        parameter: String,
        visit_key: String,
    },

    #[error(transparent)]
    Qc(#[from] QcError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
