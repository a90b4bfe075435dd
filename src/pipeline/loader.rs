//! Production run loader for delimited files
//!
//! The source is validated with the `csv` reader (strict field counts, trimmed
//! cells) and materialized as a polars `DataFrame` with normalized column names.
//! Rows with any missing cell are removed before the table is handed on.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use polars::prelude::*;

use super::columns::{first_duplicate, normalize_column_name};
use super::error::{PipelineError, PipelineResult};
use super::missing::{analyze_missing_values, drop_incomplete_rows};

/// Cell texts treated as missing values (after trimming).
///
/// Numeric cells that parse to `NaN` in any spelling (`NAN`, `+nan`) are
/// missing as well, see `typed_column`.
pub const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What happened while loading a source, for display in the run summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Data rows in the source (header excluded)
    pub rows_read: usize,
    /// Rows removed because at least one cell was missing
    pub rows_dropped: usize,
    /// Number of columns in the table
    pub columns: usize,
    /// Missing ratio per column in the raw rows, highest first
    pub missing_by_column: Vec<(String, f64)>,
    /// 0-based data row index in the source of each kept run, in table order
    pub source_rows: Vec<usize>,
}

impl LoadReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_dropped
    }
}

/// Load production runs from a CSV file.
///
/// Returns only complete rows, with normalized column names, in source order.
pub fn load_production_runs(path: &Path) -> PipelineResult<DataFrame> {
    load_with_report(path).map(|(df, _)| df)
}

/// Load production runs and report how many rows the completeness filter removed.
pub fn load_with_report(path: &Path) -> PipelineResult<(DataFrame, LoadReport)> {
    let raw = read_raw_table(path)?;
    let rows_read = raw.height();
    let missing_by_column = analyze_missing_values(&raw);

    let (df, source_rows) = drop_incomplete_rows(&raw)?;

    let report = LoadReport {
        rows_read,
        rows_dropped: rows_read - source_rows.len(),
        columns: df.width(),
        missing_by_column,
        source_rows,
    };

    Ok((df, report))
}

/// Get normalized column names from a CSV file without reading its rows
pub fn get_column_names(path: &Path) -> PipelineResult<Vec<String>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    Ok(headers.iter().map(|h| normalize_column_name(h)).collect())
}

/// Read every row into a DataFrame with normalized names, keeping missing cells as nulls.
fn read_raw_table(path: &Path) -> PipelineResult<DataFrame> {
    let mut reader = open_reader(path)?;
    let raw_headers = read_headers(&mut reader, path)?;

    let headers: Vec<String> = raw_headers
        .iter()
        .map(|h| normalize_column_name(h))
        .collect();
    if let Some(duplicate) = first_duplicate(&headers) {
        return Err(PipelineError::malformed(
            path,
            format!("duplicate column '{}' after normalization", duplicate),
        ));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {
                for (column, value) in cells.iter_mut().zip(record.iter()) {
                    column.push(parse_cell(value));
                }
            }
            Ok(false) => break,
            Err(e) => return Err(malformed_from_csv(path, e)),
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| typed_column(name, values))
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn open_reader(path: &Path) -> PipelineResult<csv::Reader<File>> {
    // Open explicitly so an unreadable path is SourceNotFound, not a parse error
    let file = File::open(path).map_err(|source| PipelineError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    if file.metadata().map(|m| m.is_dir()).unwrap_or(false) {
        return Err(PipelineError::SourceNotFound {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path is a directory"),
        });
    }

    Ok(ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(file))
}

fn read_headers(reader: &mut csv::Reader<File>, path: &Path) -> PipelineResult<Vec<String>> {
    let headers = reader
        .headers()
        .map_err(|e| malformed_from_csv(path, e))?
        .clone();

    if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
        return Err(PipelineError::malformed(path, "missing header row"));
    }

    Ok(headers.iter().map(str::to_string).collect())
}

fn malformed_from_csv(path: &Path, err: csv::Error) -> PipelineError {
    let reason = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
            format!(
                "line {} has {} field(s), expected {}",
                line, len, expected_len
            )
        }
        csv::ErrorKind::Utf8 { .. } => "source is not valid UTF-8 text".to_string(),
        _ => err.to_string(),
    };
    PipelineError::malformed(path, reason)
}

fn parse_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if NULL_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build a column typed as Int64, Float64 or String from its cell texts.
fn typed_column(name: &str, values: Vec<Option<String>>) -> Column {
    let present = || values.iter().flatten();

    if present().next().is_none() {
        let nulls: Vec<Option<f64>> = vec![None; values.len()];
        return Column::new(name.into(), nulls);
    }

    if present().all(|v| v.parse::<i64>().is_ok()) {
        let parsed: Vec<Option<i64>> = values
            .iter()
            .map(|v| v.as_deref().and_then(|s| s.parse().ok()))
            .collect();
        return Column::new(name.into(), parsed);
    }

    if present().all(|v| v.parse::<f64>().is_ok()) {
        let parsed: Vec<Option<f64>> = values
            .iter()
            .map(|v| {
                v.as_deref()
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|x| !x.is_nan())
            })
            .collect();
        return Column::new(name.into(), parsed);
    }

    Column::new(name.into(), values)
}
