//! Measurement table loading.
//!
//! Accepts files carrying either the composite `quality_flag_long` column or
//! only the legacy `quality_flag` column. Unpacked QC columns from a previous
//! save are dropped and regenerated on export.

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use profqc_common::{is_missing_text, parse_f64, parse_i64};
use profqc_model::columns;
use profqc_model::{Depth, Measurement, MeasurementTable, ModelError, QcFlag, QcFlags};

use crate::error::{LoadError, Result};
use crate::reader::{column_names, column_text, optional_column_text, read_frame};

/// Columns held in typed `Measurement` fields rather than in attributes.
const CORE_COLUMNS: [&str; 6] = [
    columns::VISIT_KEY,
    columns::SERNO,
    columns::PARAMETER,
    columns::DEPTH,
    columns::VALUE,
    columns::QUALITY_FLAG_LONG,
];

/// Loads a measurement file into a consistent table.
pub fn load_measurements(path: &Path) -> Result<MeasurementTable> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();
    let df = read_frame(path)?;
    let table = measurements_from_frame(&df)?;
    info!(
        rows = table.len(),
        columns = table.columns().len(),
        "measurements loaded"
    );
    Ok(table)
}

/// Zero-pads a numeric series number to three digits (`7` -> `"007"`).
pub fn pad_serno(raw: &str) -> String {
    let trimmed = raw.trim();
    match parse_i64(trimmed) {
        Some(number) if number >= 0 => format!("{number:03}"),
        _ => trimmed.to_string(),
    }
}

pub fn measurements_from_frame(df: &DataFrame) -> Result<MeasurementTable> {
    let source_columns = column_names(df);

    let sernos: Vec<String> = column_text(df, columns::SERNO)?
        .iter()
        .map(|raw| pad_serno(raw))
        .collect();
    let parameters = column_text(df, columns::PARAMETER)?;
    let depths = column_text(df, columns::DEPTH)?;
    let values = optional_column_text(df, columns::VALUE)?;
    let visit_keys = match optional_column_text(df, columns::VISIT_KEY)? {
        Some(keys) => keys,
        None => synthesize_visit_keys(df, &sernos)?,
    };

    let long_flags = optional_column_text(df, columns::QUALITY_FLAG_LONG)?;
    let simple_flags = optional_column_text(df, columns::QUALITY_FLAG)?;
    if long_flags.is_none() && simple_flags.is_none() {
        return Err(LoadError::MissingColumn(columns::QUALITY_FLAG_LONG.to_string()));
    }

    let attribute_columns: Vec<(String, Vec<String>)> = source_columns
        .iter()
        .filter(|name| !CORE_COLUMNS.contains(&name.as_str()) && !columns::is_unpacked_qc(name))
        .map(|name| column_text(df, name).map(|cells| (name.clone(), cells)))
        .collect::<Result<_>>()?;

    let mut table = MeasurementTable::new(source_columns);
    let mut synthesized = 0usize;
    for idx in 0..df.height() {
        let row = idx + 1;
        let depth = parse_f64(&depths[idx]).ok_or_else(|| LoadError::InvalidNumber {
            row,
            column: columns::DEPTH.to_string(),
            value: depths[idx].clone(),
        })?;

        let long = long_flags
            .as_ref()
            .map(|cells| cells[idx].trim())
            .filter(|cell| !cell.is_empty());
        let flags = match (long, simple_flags.as_ref()) {
            (Some(long), _) => QcFlags::parse(long)
                .map_err(|source| LoadError::InvalidQualityFlag { row, source })?,
            (None, Some(simple)) => {
                synthesized += 1;
                QcFlags::from_simple(parse_simple_flag(&simple[idx], row)?)
            }
            (None, None) => {
                return Err(LoadError::InvalidQualityFlag {
                    row,
                    source: ModelError::InvalidFormat {
                        value: String::new(),
                        reason: "empty quality_flag_long".to_string(),
                    },
                });
            }
        };

        let attributes: BTreeMap<String, String> = attribute_columns
            .iter()
            .map(|(name, cells)| (name.clone(), cells[idx].clone()))
            .collect();

        table.push(Measurement {
            visit_key: visit_keys[idx].trim().to_string(),
            serno: sernos[idx].clone(),
            parameter: parameters[idx].trim().to_string(),
            depth: Depth::new(depth),
            depth_text: Some(depths[idx].clone()),
            value: values
                .as_ref()
                .map(|cells| cells[idx].clone())
                .unwrap_or_default(),
            flags,
            attributes,
        });
    }

    if synthesized > 0 {
        debug!(
            rows = synthesized,
            "quality_flag_long synthesized from legacy quality_flag"
        );
    }
    Ok(table)
}

/// Legacy single flag; an empty cell means no QC has been performed.
fn parse_simple_flag(raw: &str, row: usize) -> Result<QcFlag> {
    if is_missing_text(raw) {
        return Ok(QcFlag::NoQcPerformed);
    }
    raw.parse::<QcFlag>()
        .map_err(|source| LoadError::InvalidQualityFlag { row, source })
}

fn synthesize_visit_keys(df: &DataFrame, sernos: &[String]) -> Result<Vec<String>> {
    let parts: Vec<Vec<String>> = columns::VISIT_KEY_PARTS
        .iter()
        .filter(|name| **name != columns::SERNO)
        .map(|name| column_text(df, name))
        .collect::<Result<_>>()
        .map_err(|_| LoadError::MissingColumn(columns::VISIT_KEY.to_string()))?;
    debug!("visit_key synthesized from country, ship, cruise and series");
    Ok((0..df.height())
        .map(|idx| {
            let mut key: Vec<&str> = parts.iter().map(|cells| cells[idx].trim()).collect();
            key.push(sernos[idx].as_str());
            key.join("_")
        })
        .collect())
}
