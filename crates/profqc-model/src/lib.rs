pub mod columns;
pub mod error;
pub mod feedback;
pub mod flag;
pub mod flags;
pub mod table;
pub mod visit;

pub use error::{ModelError, Result};
pub use feedback::{FeedbackRow, FeedbackTable};
pub use flag::{QcField, QcFlag};
pub use flags::{AutomaticFlags, QcFlags};
pub use table::{Depth, Measurement, MeasurementKey, MeasurementTable, VisitMeasurementKey};
pub use visit::{FilterDimension, Visit, VisitFilter, VisitIndex};
