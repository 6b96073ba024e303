//! Row-oriented measurement table, one row per parameter measurement.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::QcFlags;
use crate::columns;

/// Sample depth in metres, compared exactly as the join key it is.
///
/// `-0.0` is normalized to `0.0` so that equality, ordering and hashing agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Depth(f64);

impl Depth {
    pub fn new(metres: f64) -> Self {
        Self(if metres == 0.0 { 0.0 } else { metres })
    }

    pub fn metres(self) -> f64 {
        self.0
    }
}

impl PartialEq for Depth {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Depth {}

impl Hash for Depth {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Ord for Depth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Depth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity used by manual QC: series number, parameter and depth.
///
/// Row indices are not stable across table rebuilds, this key is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasurementKey {
    pub serno: String,
    pub parameter: String,
    pub depth: Depth,
}

/// Identity used to join feedback files: visit key, depth and parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisitMeasurementKey {
    pub visit_key: String,
    pub depth: Depth,
    pub parameter: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub visit_key: String,
    pub serno: String,
    pub parameter: String,
    pub depth: Depth,
    /// `DEPH` exactly as written in the source, echoed on export. `None`
    /// for rows built in code, which export the formatted [`Depth`].
    pub depth_text: Option<String>,
    /// Value as read from the source; parse with [`Measurement::numeric_value`].
    pub value: String,
    pub flags: QcFlags,
    /// Every other source column, by column name.
    pub attributes: BTreeMap<String, String>,
}

impl Measurement {
    pub fn key(&self) -> MeasurementKey {
        MeasurementKey {
            serno: self.serno.clone(),
            parameter: self.parameter.clone(),
            depth: self.depth,
        }
    }

    pub fn visit_measurement_key(&self) -> VisitMeasurementKey {
        VisitMeasurementKey {
            visit_key: self.visit_key.clone(),
            depth: self.depth,
            parameter: self.parameter.clone(),
        }
    }

    pub fn numeric_value(&self) -> Option<f64> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Text of any column, including the unpacked QC columns which are
    /// always regenerated from `flags`.
    pub fn cell(&self, column: &str) -> Option<String> {
        let [incoming, automatic, manual, total] = self.flags.segments();
        match column {
            columns::VISIT_KEY => Some(self.visit_key.clone()),
            columns::SERNO => Some(self.serno.clone()),
            columns::PARAMETER => Some(self.parameter.clone()),
            columns::DEPTH => Some(
                self.depth_text
                    .clone()
                    .unwrap_or_else(|| format_depth(self.depth)),
            ),
            columns::VALUE => Some(self.value.clone()),
            columns::QUALITY_FLAG_LONG => Some(self.flags.to_string()),
            columns::INCOMING_QC => Some(incoming),
            columns::AUTO_QC => Some(automatic),
            columns::MANUAL_QC => Some(manual),
            columns::TOTAL_QC => Some(total),
            other => self.attributes.get(other).cloned(),
        }
    }
}

fn format_depth(depth: Depth) -> String {
    let metres = depth.metres();
    if metres.fract() == 0.0 && metres.abs() < 1e15 {
        format!("{}", metres as i64)
    } else {
        metres.to_string()
    }
}

/// All measurements of a loaded file.
///
/// `columns` keeps the source column order for export; `quality_flag_long`
/// and `visit_key` are always present, the unpacked QC columns never are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    columns: Vec<String>,
    rows: Vec<Measurement>,
}

impl MeasurementTable {
    pub fn new(columns: Vec<String>) -> Self {
        let mut columns: Vec<String> = columns
            .into_iter()
            .filter(|column| !columns::is_unpacked_qc(column))
            .collect();
        for required in [columns::VISIT_KEY, columns::QUALITY_FLAG_LONG] {
            if !columns.iter().any(|c| c == required) {
                columns.push(required.to_string());
            }
        }
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Measurement>) -> Self {
        let mut table = Self::new(columns);
        table.rows = rows;
        table
    }

    pub fn push(&mut self, row: Measurement) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        columns::is_unpacked_qc(column) || self.columns.iter().any(|c| c == column)
    }

    /// Export column order: source columns followed by the unpacked QC columns.
    pub fn export_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(columns::UNPACKED_QC.iter().map(|c| (*c).to_string()))
            .collect()
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Measurement] {
        &mut self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Measurement> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QcFlag;

    fn measurement(value: &str) -> Measurement {
        Measurement {
            visit_key: "77_10_0001_001".to_string(),
            serno: "001".to_string(),
            parameter: "TEMP".to_string(),
            depth: Depth::new(10.0),
            depth_text: None,
            value: value.to_string(),
            flags: QcFlags::from_simple(QcFlag::GoodData),
            attributes: BTreeMap::from([("STATN".to_string(), "BY31".to_string())]),
        }
    }

    #[test]
    fn depth_normalizes_negative_zero() {
        assert_eq!(Depth::new(-0.0), Depth::new(0.0));
        assert!(Depth::new(5.0) < Depth::new(10.5));
    }

    #[test]
    fn cell_regenerates_unpacked_columns() {
        let mut row = measurement("7.25");
        row.flags.set_manual(QcFlag::BadData);
        assert_eq!(row.cell(columns::MANUAL_QC).as_deref(), Some("4"));
        assert_eq!(row.cell(columns::TOTAL_QC).as_deref(), Some("4"));
        assert_eq!(
            row.cell(columns::QUALITY_FLAG_LONG).as_deref(),
            Some("1_0000000000_4_4")
        );
        assert_eq!(row.cell(columns::DEPTH).as_deref(), Some("10"));
        row.depth_text = Some("10.00".to_string());
        assert_eq!(row.cell(columns::DEPTH).as_deref(), Some("10.00"));
        assert_eq!(row.cell("STATN").as_deref(), Some("BY31"));
        assert_eq!(row.cell("unit"), None);
    }

    #[test]
    fn numeric_value_ignores_blank_and_text() {
        assert_eq!(measurement("7.25").numeric_value(), Some(7.25));
        assert_eq!(measurement(" ").numeric_value(), None);
        assert_eq!(measurement("<0.2").numeric_value(), None);
    }

    #[test]
    fn table_drops_unpacked_columns_and_adds_required_ones() {
        let table = MeasurementTable::new(vec![
            "SERNO".to_string(),
            "TOTAL_QC".to_string(),
            "quality_flag".to_string(),
        ]);
        assert_eq!(
            table.columns(),
            ["SERNO", "quality_flag", "visit_key", "quality_flag_long"]
        );
        assert!(table.has_column(columns::AUTO_QC));
        assert_eq!(table.export_columns().len(), 8);
    }
}
