//! Feedback rows: manual QC decisions made outside the tool, keyed the way
//! the live table is keyed for joins.

use crate::VisitMeasurementKey;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRow {
    pub key: VisitMeasurementKey,
    /// Manual flag as typed by the analyst; `None` for an empty cell.
    pub manual_qc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackTable {
    pub rows: Vec<FeedbackRow>,
    /// Sheet rows dropped on load because their join key was unusable.
    pub invalid_rows: usize,
}

impl FeedbackTable {
    pub fn new(rows: Vec<FeedbackRow>) -> Self {
        Self {
            rows,
            invalid_rows: 0,
        }
    }

    #[must_use]
    pub fn with_invalid_rows(mut self, invalid_rows: usize) -> Self {
        self.invalid_rows = invalid_rows;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
