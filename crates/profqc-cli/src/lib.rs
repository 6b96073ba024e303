//! Library side of the `profqc` binary.

pub mod commands;
pub mod logging;
pub mod types;
