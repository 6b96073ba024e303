//! Shared utilities for the profile QC crates.
//!
//! Cell conversion helpers used at the polars boundary, where every column is
//! read as text and typed values are parsed on demand.

pub mod cells;

pub use cells::{any_to_string, format_numeric, is_missing_text, parse_f64, parse_i64};
