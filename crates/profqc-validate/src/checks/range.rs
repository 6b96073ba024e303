use std::collections::BTreeMap;

use profqc_model::{MeasurementTable, QcField, QcFlag};

use crate::config::RangeLimit;
use crate::engine::AutomaticCheck;
use crate::error::Result;
use crate::log::ValidationLog;

/// Flags values outside per-parameter limits as bad data.
///
/// Rows of parameters without limits, and rows without a numeric value, are
/// left at "no QC performed".
#[derive(Debug, Clone, Default)]
pub struct RangeCheck {
    limits: BTreeMap<String, RangeLimit>,
}

impl RangeCheck {
    pub fn new(limits: BTreeMap<String, RangeLimit>) -> Self {
        Self { limits }
    }
}

impl AutomaticCheck for RangeCheck {
    fn field(&self) -> QcField {
        QcField::Range
    }

    fn description(&self) -> &str {
        "Value within the configured range of its parameter"
    }

    fn check(&self, table: &MeasurementTable, log: &mut ValidationLog) -> Result<Vec<QcFlag>> {
        let name = self.name().to_string();
        let mut passed: BTreeMap<&str, usize> = BTreeMap::new();
        let mut flags = Vec::with_capacity(table.len());

        for (index, row) in table.rows().iter().enumerate() {
            let (Some(limit), Some(value)) =
                (self.limits.get(&row.parameter), row.numeric_value())
            else {
                flags.push(QcFlag::NoQcPerformed);
                continue;
            };
            if limit.contains(value) {
                *passed.entry(row.parameter.as_str()).or_default() += 1;
                flags.push(QcFlag::GoodData);
            } else {
                log.record_fail(
                    &name,
                    Some(&row.parameter),
                    format!(
                        "row {}: {} at {} m outside {}",
                        index + 1,
                        row.value.trim(),
                        row.depth,
                        describe(limit)
                    ),
                );
                flags.push(QcFlag::BadData);
            }
        }

        for (parameter, count) in passed {
            log.record_success(&name, Some(parameter), format!("{count} values within range"));
        }
        Ok(flags)
    }
}

fn describe(limit: &RangeLimit) -> String {
    let bound = |b: Option<f64>| b.map_or_else(|| "..".to_string(), |v| v.to_string());
    format!("[{}, {}]", bound(limit.min), bound(limit.max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use profqc_model::{Depth, Measurement, QcFlags};

    fn row(parameter: &str, value: &str) -> Measurement {
        Measurement {
            visit_key: "V1".to_string(),
            serno: "001".to_string(),
            parameter: parameter.to_string(),
            depth: Depth::new(10.0),
            depth_text: None,
            value: value.to_string(),
            flags: QcFlags::from_simple(QcFlag::GoodData),
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn flags_values_outside_limits() {
        let check = RangeCheck::new(BTreeMap::from([(
            "TEMP".to_string(),
            RangeLimit {
                min: Some(-2.0),
                max: Some(40.0),
            },
        )]));
        let table = MeasurementTable::with_rows(
            vec![],
            vec![
                row("TEMP", "12.5"),
                row("TEMP", "45"),
                row("TEMP", ""),
                row("PHOS", "999"),
            ],
        );
        let mut log = ValidationLog::new();
        let flags = check.check(&table, &mut log).unwrap();
        assert_eq!(
            flags,
            [
                QcFlag::GoodData,
                QcFlag::BadData,
                QcFlag::NoQcPerformed,
                QcFlag::NoQcPerformed
            ]
        );
        let remarks = log.get("Range").unwrap();
        assert_eq!(remarks.fail["TEMP"], ["row 2: 45 at 10 m outside [-2, 40]"]);
        assert_eq!(remarks.success["TEMP"], ["1 values within range"]);
    }
}
