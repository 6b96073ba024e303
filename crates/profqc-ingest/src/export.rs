//! Export of measurement tables and text reports.
//!
//! Files are written to a temporary sibling first and renamed into place, so
//! an interrupted save never truncates the previous file.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::{Column, CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series};
use tracing::info;

use profqc_model::MeasurementTable;

use crate::error::{LoadError, Result};
use crate::reader::delimiter_for;

/// Builds an all-text frame of the table in export column order, unpacked QC
/// columns included.
pub fn table_to_frame(table: &MeasurementTable) -> Result<DataFrame> {
    let columns = table.export_columns();
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.cell(column).unwrap_or_default())
                .collect()
        })
        .collect();
    text_frame(&columns, &rows)
}

/// Builds a String-typed frame from rows of cells. Empty cells become nulls
/// so they are written as empty fields.
pub fn text_frame(columns: &[String], rows: &[Vec<String>]) -> Result<DataFrame> {
    let cols: Vec<Column> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).filter(|c| !c.is_empty()))
                .collect();
            Series::new(name.as_str().into(), cells).into_column()
        })
        .collect();
    Ok(DataFrame::new(cols)?)
}

/// Writes a frame with the delimiter implied by the path extension.
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    let write_error = |message: String| LoadError::Write {
        path: path.to_path_buf(),
        message,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }

    let temp_path = path.with_extension("profqc.tmp");
    let mut file = File::create(&temp_path).map_err(|e| write_error(e.to_string()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(delimiter_for(path))
        .finish(df)
        .map_err(|e| write_error(e.to_string()))?;
    file.sync_all().map_err(|e| write_error(e.to_string()))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| write_error(e.to_string()))?;
    Ok(())
}

pub fn write_measurements(table: &MeasurementTable, path: &Path) -> Result<()> {
    let mut df = table_to_frame(table)?;
    write_frame(&mut df, path)?;
    info!(path = %path.display(), rows = table.len(), "measurements saved");
    Ok(())
}

pub fn write_text_table(columns: &[String], rows: &[Vec<String>], path: &Path) -> Result<()> {
    let mut df = text_frame(columns, rows)?;
    write_frame(&mut df, path)?;
    info!(path = %path.display(), rows = rows.len(), "table saved");
    Ok(())
}
