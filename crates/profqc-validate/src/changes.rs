//! Changes report: rows whose final flag differs from the incoming one.

use serde::Serialize;
use tracing::debug;

use profqc_model::MeasurementTable;
use profqc_model::columns::{AUTOMATIC_DETAIL_MARKER, REPORT_COLUMNS};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangesReport {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ChangesReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Report projection: the fixed reporting columns present in the table,
/// followed by every automatic-QC detail column.
pub fn report_columns(table: &MeasurementTable) -> Vec<String> {
    let mut columns: Vec<String> = REPORT_COLUMNS
        .iter()
        .filter(|column| table.has_column(column))
        .map(|column| (*column).to_string())
        .collect();
    for column in table.columns() {
        if column.contains(AUTOMATIC_DETAIL_MARKER) && !columns.contains(column) {
            columns.push(column.clone());
        }
    }
    columns
}

/// Selects rows whose incoming and total segments differ.
///
/// Segments are compared as serialized, so a total read verbatim from a file
/// is reported the same way it was written.
pub fn changes_report(table: &MeasurementTable) -> ChangesReport {
    let columns = report_columns(table);
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .filter(|row| {
            let [incoming, _, _, total] = row.flags.segments();
            incoming != total
        })
        .map(|row| {
            columns
                .iter()
                .map(|column| row.cell(column).unwrap_or_default())
                .collect()
        })
        .collect();
    debug!(rows = rows.len(), columns = columns.len(), "changes report built");
    ChangesReport { columns, rows }
}
