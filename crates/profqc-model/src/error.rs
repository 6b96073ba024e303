use thiserror::Error;

/// Data-integrity errors raised by the composite flag codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid quality flag string {value:?}: {reason}")]
    InvalidFormat { value: String, reason: String },

    #[error("invalid quality flag code {code:?} in {value:?}")]
    InvalidFlagCode { value: String, code: String },

    #[error("automatic segment of {value:?} has {width} flags, at most {max} are defined")]
    AutomaticTooWide {
        value: String,
        width: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
