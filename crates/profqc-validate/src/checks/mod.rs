//! Built-in automatic checks.

mod detection_limit;
mod range;

pub use detection_limit::DetectionLimitCheck;
pub use range::RangeCheck;

use profqc_model::QcField;

use crate::config::QcConfig;
use crate::engine::AutomaticCheck;
use crate::error::{QcError, Result};

/// Instantiates the checks enabled in `config`, in slot order.
pub fn build_checks(config: &QcConfig) -> Result<Vec<Box<dyn AutomaticCheck>>> {
    config
        .enabled_checks()?
        .into_iter()
        .map(|field| -> Result<Box<dyn AutomaticCheck>> {
            match field {
                QcField::DetectionLimit => Ok(Box::new(DetectionLimitCheck::new(
                    config.detection_limits.clone(),
                ))),
                QcField::Range => Ok(Box::new(RangeCheck::new(config.ranges.clone()))),
                other => Err(QcError::Config(format!(
                    "no built-in check for the {other} slot"
                ))),
            }
        })
        .collect()
}
