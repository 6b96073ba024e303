//! Flag reconciliation for profile measurements.
//!
//! Every function here is a transformation over a caller-owned
//! [`MeasurementTable`](profqc_model::MeasurementTable); none of them emit
//! session events or keep state between calls.

pub mod changes;
pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod log;
pub mod manual;

pub use changes::{ChangesReport, changes_report, report_columns};
pub use checks::{DetectionLimitCheck, RangeCheck, build_checks};
pub use config::{CONFIG_ENV_VAR, QcConfig, RangeLimit};
pub use engine::{AutomaticCheck, AutomaticQc, PassSummary};
pub use error::{QcError, Result};
pub use feedback::{MergeOutcome, merge_feedback};
pub use log::{CheckRemarks, GENERAL_COLUMN, ValidationLog};
pub use manual::{ManualOutcome, apply_manual_override};
