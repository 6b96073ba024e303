use std::collections::BTreeMap;

use profqc_model::{MeasurementTable, QcField, QcFlag};

use crate::engine::AutomaticCheck;
use crate::error::Result;
use crate::log::ValidationLog;

/// Flags values reported below the detection limit of their parameter.
///
/// A value written as `<0.2` is below detection regardless of the configured
/// limit.
#[derive(Debug, Clone, Default)]
pub struct DetectionLimitCheck {
    limits: BTreeMap<String, f64>,
}

impl DetectionLimitCheck {
    pub fn new(limits: BTreeMap<String, f64>) -> Self {
        Self { limits }
    }

    fn flag(&self, parameter: &str, raw: &str, value: Option<f64>) -> QcFlag {
        if raw.trim_start().starts_with('<') {
            return QcFlag::BelowDetection;
        }
        match (self.limits.get(parameter), value) {
            (Some(limit), Some(value)) if value < *limit => QcFlag::BelowDetection,
            (Some(_), Some(_)) => QcFlag::GoodData,
            _ => QcFlag::NoQcPerformed,
        }
    }
}

impl AutomaticCheck for DetectionLimitCheck {
    fn field(&self) -> QcField {
        QcField::DetectionLimit
    }

    fn description(&self) -> &str {
        "Value above the detection limit of its parameter"
    }

    fn check(&self, table: &MeasurementTable, log: &mut ValidationLog) -> Result<Vec<QcFlag>> {
        let name = self.name().to_string();
        let mut below: BTreeMap<&str, usize> = BTreeMap::new();
        let flags: Vec<QcFlag> = table
            .rows()
            .iter()
            .map(|row| {
                let flag = self.flag(&row.parameter, &row.value, row.numeric_value());
                if flag == QcFlag::BelowDetection {
                    *below.entry(row.parameter.as_str()).or_default() += 1;
                }
                flag
            })
            .collect();

        for (parameter, count) in below {
            log.record_fail(
                &name,
                Some(parameter),
                format!("{count} values below detection limit"),
            );
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_limit_and_censored_values_are_flagged() {
        let check = DetectionLimitCheck::new(BTreeMap::from([("PHOS".to_string(), 0.02)]));
        assert_eq!(check.flag("PHOS", "0.01", Some(0.01)), QcFlag::BelowDetection);
        assert_eq!(check.flag("PHOS", "0.02", Some(0.02)), QcFlag::GoodData);
        assert_eq!(check.flag("NTRZ", "<0.1", None), QcFlag::BelowDetection);
        assert_eq!(check.flag("NTRZ", "0.05", Some(0.05)), QcFlag::NoQcPerformed);
        assert_eq!(check.flag("PHOS", "", None), QcFlag::NoQcPerformed);
    }
}
