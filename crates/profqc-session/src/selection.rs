//! Point selection for manual QC.

use std::fmt;

use profqc_model::{MeasurementKey, QcFlags};

/// Identifies the view a selection came from, so it can be asked to
/// re-display the same rows after a flag change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedValue {
    /// Row index in the table snapshot the selection was made on.
    pub index: usize,
    pub key: MeasurementKey,
    pub flags: QcFlags,
}

/// Rows picked by one gesture in one plotted series.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub source: SourceId,
    pub parameter: String,
    pub values: Vec<SelectedValue>,
}

impl Selection {
    pub fn indices(&self) -> Vec<usize> {
        self.values.iter().map(|value| value.index).collect()
    }

    pub fn keys(&self) -> Vec<MeasurementKey> {
        self.values.iter().map(|value| value.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// At most one selection is active; a new one replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Empty,
    Selected(Selection),
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Empty => None,
            Self::Selected(selection) => Some(selection),
        }
    }

    /// Leaves `Empty` behind and returns the previous selection, if any.
    pub fn take(&mut self) -> Option<Selection> {
        match std::mem::take(self) {
            Self::Empty => None,
            Self::Selected(selection) => Some(selection),
        }
    }
}
