//! Merge of analyst-edited feedback files.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use profqc_model::{FeedbackRow, FeedbackTable, MeasurementTable, QcFlag, VisitMeasurementKey};

/// Counts of one feedback merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub feedback_rows: usize,
    /// Live rows with a feedback row under the same key.
    pub matched: usize,
    /// Live rows whose manual flag was replaced.
    pub applied: usize,
    /// Matched rows skipped because the feedback flag is not a flag code.
    pub unparseable: usize,
    /// Feedback keys without a live row.
    pub unmatched: usize,
    /// Feedback rows ignored because an earlier row had the same key.
    pub duplicates: usize,
    /// Sheet rows dropped on load for an unusable join key.
    pub invalid_key: usize,
}

/// Applies manual flags from `feedback` to the rows of `table` with the same
/// visit key, depth and parameter.
///
/// Rows are only ever updated, never added: feedback rows without a live
/// counterpart are counted and ignored. A row is updated when the feedback
/// flag is present and differs from the row's manual flag, so merging the
/// same feedback twice changes nothing the second time.
pub fn merge_feedback(table: &mut MeasurementTable, feedback: &FeedbackTable) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        feedback_rows: feedback.len(),
        invalid_key: feedback.invalid_rows,
        ..MergeOutcome::default()
    };

    let mut by_key: HashMap<&VisitMeasurementKey, &FeedbackRow> = HashMap::new();
    for row in &feedback.rows {
        if by_key.contains_key(&row.key) {
            outcome.duplicates += 1;
        } else {
            by_key.insert(&row.key, row);
        }
    }

    let mut hit: HashSet<VisitMeasurementKey> = HashSet::new();
    for row in table.rows_mut() {
        let key = row.visit_measurement_key();
        let Some(entry) = by_key.get(&key) else {
            continue;
        };
        outcome.matched += 1;
        hit.insert(key);

        let Some(raw) = entry.manual_qc.as_deref() else {
            continue;
        };
        if row.flags.manual().to_string() == raw {
            continue;
        }
        match raw.parse::<QcFlag>() {
            Ok(flag) => {
                row.flags.set_manual(flag);
                outcome.applied += 1;
            }
            Err(error) => {
                debug!(%error, parameter = %row.parameter, "unparseable feedback flag skipped");
                outcome.unparseable += 1;
            }
        }
    }
    outcome.unmatched = by_key.len() - hit.len();

    if outcome.unmatched > 0 || outcome.unparseable > 0 || outcome.invalid_key > 0 {
        warn!(
            unmatched = outcome.unmatched,
            unparseable = outcome.unparseable,
            invalid_key = outcome.invalid_key,
            duplicates = outcome.duplicates,
            "feedback rows skipped"
        );
    }
    info!(
        feedback_rows = outcome.feedback_rows,
        matched = outcome.matched,
        applied = outcome.applied,
        "feedback merged"
    );
    outcome
}
