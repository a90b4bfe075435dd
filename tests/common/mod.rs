//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Header row as it appears in raw production exports (spaces, padding after commas)
pub const RAW_HEADER: &str =
    "Catalyst Usage (kg), Energy Consumption (kWh), Raw Material Input (kg), Biofuel Yield (L)";

/// The worked example: one complete run, one run missing energy, one run with zero input
pub const EXAMPLE_CSV: &str = "\
Catalyst Usage (kg), Energy Consumption (kWh), Raw Material Input (kg), Biofuel Yield (L)
2, 3, 5, 20
1, , 4, 10
0, 0, 0, 5
";

/// Write `contents` to a CSV file inside a fresh temporary directory
pub fn write_temp_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("runs.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    drop(file);

    (temp_dir, csv_path)
}

/// A clean production run table with normalized column names
///
/// Run 0: total 10, efficiency 2.0
/// Run 1: total 20, efficiency 2.5
/// Run 2: total 4,  efficiency 1.0
pub fn create_runs_dataframe() -> DataFrame {
    df! {
        "Catalyst_Usage_(kg)" => [2.0f64, 4.0, 1.0],
        "Energy_Consumption_(kWh)" => [3.0f64, 10.0, 1.0],
        "Raw_Material_Input_(kg)" => [5.0f64, 6.0, 2.0],
        "Biofuel_Yield_(L)" => [20.0f64, 50.0, 4.0],
    }
    .unwrap()
}

/// Same runs, stored as integer columns with an extra pass-through column
pub fn create_integer_runs_dataframe() -> DataFrame {
    df! {
        "Run_Label" => ["a", "b", "c"],
        "Catalyst_Usage_(kg)" => [2i64, 4, 1],
        "Energy_Consumption_(kWh)" => [3i64, 10, 1],
        "Raw_Material_Input_(kg)" => [5i64, 6, 2],
        "Biofuel_Yield_(L)" => [20i64, 50, 4],
    }
    .unwrap()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Column names as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Column values as `f64`
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect()
}

/// Relative closeness check for derived metrics
pub fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= 1e-9 * scale,
        "expected {} but got {}",
        expected,
        actual
    );
}
