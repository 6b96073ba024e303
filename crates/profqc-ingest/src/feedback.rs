//! Feedback file loading.

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use profqc_common::{is_missing_text, parse_f64, parse_i64};
use profqc_model::columns;
use profqc_model::{Depth, FeedbackRow, FeedbackTable, VisitMeasurementKey};

use crate::error::Result;
use crate::reader::{column_text, read_frame};

pub fn load_feedback(path: &Path) -> Result<FeedbackTable> {
    let df = read_frame(path)?;
    let feedback = feedback_from_frame(&df)?;
    info!(path = %path.display(), rows = feedback.len(), "feedback loaded");
    Ok(feedback)
}

/// Reads the join keys and the manual flag of an analyst-edited sheet.
///
/// Manual flags are kept as text: integral spreadsheet numbers (`4.0`) are
/// normalized to their code, anything else is passed through unchanged so
/// the merge can decide to skip it. Rows without a visit key, a parameter
/// or a numeric depth cannot be joined; they are dropped and counted in
/// [`FeedbackTable::invalid_rows`] instead of failing the whole sheet.
pub fn feedback_from_frame(df: &DataFrame) -> Result<FeedbackTable> {
    let visit_keys = column_text(df, columns::VISIT_KEY)?;
    let depths = column_text(df, columns::DEPTH)?;
    let parameters = column_text(df, columns::PARAMETER)?;
    let manual = column_text(df, columns::MANUAL_QC)?;

    let mut rows = Vec::with_capacity(df.height());
    let mut invalid = 0usize;
    for idx in 0..df.height() {
        let visit_key = visit_keys[idx].trim();
        let parameter = parameters[idx].trim();
        let depth = parse_f64(&depths[idx])
            .filter(|depth| depth.is_finite())
            .filter(|_| !visit_key.is_empty() && !parameter.is_empty());
        let Some(depth) = depth else {
            debug!(
                row = idx + 1,
                visit_key,
                depth = %depths[idx],
                parameter,
                "feedback row without a usable key dropped"
            );
            invalid += 1;
            continue;
        };
        rows.push(FeedbackRow {
            key: VisitMeasurementKey {
                visit_key: visit_key.to_string(),
                depth: Depth::new(depth),
                parameter: parameter.to_string(),
            },
            manual_qc: normalize_manual(&manual[idx]),
        });
    }
    if invalid > 0 {
        warn!(rows = invalid, "feedback rows without a usable key skipped");
    }
    Ok(FeedbackTable::new(rows).with_invalid_rows(invalid))
}

fn normalize_manual(raw: &str) -> Option<String> {
    if is_missing_text(raw) {
        return None;
    }
    let trimmed = raw.trim();
    Some(match parse_i64(trimmed) {
        Some(code) => code.to_string(),
        None => trimmed.to_string(),
    })
}
