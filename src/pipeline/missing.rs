//! Missing value analysis and the table-wide completeness filter

use polars::prelude::*;

use super::error::PipelineResult;

/// Analyze missing values per column.
///
/// Returns `(column, missing_ratio)` pairs sorted by ratio, highest first.
/// Ties keep column order.
pub fn analyze_missing_values(df: &DataFrame) -> Vec<(String, f64)> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|column| {
            (
                column.name().to_string(),
                column.null_count() as f64 / rows,
            )
        })
        .collect();

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    missing_ratios
}

/// Remove every row that has a missing value in any column.
///
/// The filter is not limited to the required columns. Row order is preserved.
/// Returns the filtered table and the source row index of every kept row, so
/// a run can still be traced back to its position in the input.
pub fn drop_incomplete_rows(df: &DataFrame) -> PipelineResult<(DataFrame, Vec<usize>)> {
    let mut complete = BooleanChunked::full("complete".into(), true, df.height());
    for column in df.get_columns() {
        complete = &complete & &column.as_materialized_series().is_not_null();
    }

    let kept_rows: Vec<usize> = complete
        .iter()
        .enumerate()
        .filter_map(|(row, keep)| (keep == Some(true)).then_some(row))
        .collect();

    Ok((df.filter(&complete)?, kept_rows))
}

/// Source row index of the run at `position`; tables built in memory have none
/// recorded and use their position.
pub fn source_row(source_rows: &[usize], position: usize) -> usize {
    source_rows.get(position).copied().unwrap_or(position)
}
