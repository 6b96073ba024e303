//! Manual override.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use profqc_model::{MeasurementKey, MeasurementTable, QcFlag};

/// Counts of one manual override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManualOutcome {
    /// Distinct keys requested.
    pub requested: usize,
    /// Requested keys that matched at least one live row.
    pub matched: usize,
    /// Live rows the flag was written to.
    pub rows_updated: usize,
}

impl ManualOutcome {
    pub fn unmatched(&self) -> usize {
        self.requested - self.matched
    }
}

/// Sets `flag` as the manual flag of every live row matching one of `keys`.
///
/// Matching is by series number, parameter and depth over the whole table,
/// never by row index. Keys that match nothing are skipped and counted.
/// Passing [`QcFlag::NoQcPerformed`] clears the override.
pub fn apply_manual_override(
    table: &mut MeasurementTable,
    keys: &[MeasurementKey],
    flag: QcFlag,
) -> ManualOutcome {
    let requested: BTreeSet<&MeasurementKey> = keys.iter().collect();
    let mut matched: BTreeSet<MeasurementKey> = BTreeSet::new();
    let mut rows_updated = 0usize;

    for row in table.rows_mut() {
        let key = row.key();
        if requested.contains(&key) {
            row.flags.set_manual(flag);
            rows_updated += 1;
            matched.insert(key);
        }
    }

    let outcome = ManualOutcome {
        requested: requested.len(),
        matched: matched.len(),
        rows_updated,
    };
    if outcome.unmatched() > 0 {
        warn!(
            unmatched = outcome.unmatched(),
            requested = outcome.requested,
            "manual flag keys without a live row were skipped"
        );
    }
    info!(
        flag = %flag,
        rows_updated = outcome.rows_updated,
        "manual QC applied"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use profqc_model::{AutomaticFlags, Depth, Measurement, QcField, QcFlags};

    fn row(visit_key: &str, parameter: &str, depth: f64, flags: QcFlags) -> Measurement {
        Measurement {
            visit_key: visit_key.to_string(),
            serno: "004".to_string(),
            parameter: parameter.to_string(),
            depth: Depth::new(depth),
            depth_text: None,
            value: "0.5".to_string(),
            flags,
            attributes: BTreeMap::new(),
        }
    }

    fn key(parameter: &str, depth: f64) -> MeasurementKey {
        MeasurementKey {
            serno: "004".to_string(),
            parameter: parameter.to_string(),
            depth: Depth::new(depth),
        }
    }

    #[test]
    fn manual_flag_wins_over_worse_automatic_flag() {
        let mut automatic = AutomaticFlags::new();
        automatic.set(QcField::Range, QcFlag::BadData);
        let flags = QcFlags::new(QcFlag::ProbablyGoodData, automatic, QcFlag::NoQcPerformed);
        let mut table = MeasurementTable::with_rows(vec![], vec![row("V1", "PHOS", 5.0, flags)]);

        let outcome = apply_manual_override(&mut table, &[key("PHOS", 5.0)], QcFlag::GoodData);
        let updated = table.rows()[0].flags;
        assert_eq!(updated.total(), QcFlag::GoodData);
        assert_eq!(updated.incoming(), QcFlag::ProbablyGoodData);
        assert_eq!(updated.automatic(), &automatic);
        assert_eq!(outcome.rows_updated, 1);
    }

    #[test]
    fn applies_to_every_matching_row_and_counts_misses() {
        let simple = QcFlags::from_simple(QcFlag::GoodData);
        let mut table = MeasurementTable::with_rows(
            vec![],
            vec![
                row("V1", "PHOS", 5.0, simple),
                row("V1", "NTRZ", 5.0, simple),
                // Same series in a second file section.
                row("V1b", "PHOS", 5.0, simple),
            ],
        );
        let keys = [key("PHOS", 5.0), key("PHOS", 5.0), key("PHOS", 999.0)];
        let outcome = apply_manual_override(&mut table, &keys, QcFlag::BadData);

        assert_eq!(
            outcome,
            ManualOutcome {
                requested: 2,
                matched: 1,
                rows_updated: 2
            }
        );
        assert_eq!(outcome.unmatched(), 1);
        let totals: Vec<String> = table.rows().iter().map(|r| r.flags.to_string()).collect();
        assert_eq!(
            totals,
            ["1_0000000000_4_4", "1_0000000000_0_1", "1_0000000000_4_4"]
        );
    }
}
