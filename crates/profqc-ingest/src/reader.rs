//! Delimited file reading into an all-text Polars DataFrame.

use std::path::Path;

use polars::prelude::{AnyValue, CsvReadOptions, DataFrame, SerReader};

use profqc_common::any_to_string;

use crate::error::{LoadError, Result};

/// Comma for `.csv` files, tab for everything else (the native save format).
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

/// Reads a delimited file with every column as String dtype.
///
/// Column names are trimmed; typed parsing happens row by row afterwards so
/// that errors can name the offending row.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let separator = delimiter_for(path);
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().trim_matches('\u{feff}').to_string())
        .collect();
    df.set_column_names(trimmed.iter().map(String::as_str))?;
    Ok(df)
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Text cells of one column; nulls become empty strings.
pub(crate) fn column_text(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
    Ok((0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Like [`column_text`], but `None` when the column is absent.
pub(crate) fn optional_column_text(df: &DataFrame, name: &str) -> Result<Option<Vec<String>>> {
    if df.get_column_names().iter().any(|c| c.as_str() == name) {
        column_text(df, name).map(Some)
    } else {
        Ok(None)
    }
}
