//! Unit tests for missing value analysis and the completeness filter

use biofuel_metrics::pipeline::{analyze_missing_values, drop_incomplete_rows, source_row};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_analyze_missing_values_basic() {
    let df = df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_partial_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)],
        "col_all_missing" => [None::<f64>, None, None, None, None],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df);
    let ratio_map: std::collections::HashMap<_, _> = ratios.into_iter().collect();

    assert!((ratio_map["col_complete"] - 0.0).abs() < 0.001);
    assert!((ratio_map["col_partial_missing"] - 0.4).abs() < 0.001);
    assert!((ratio_map["col_all_missing"] - 1.0).abs() < 0.001);
}

#[test]
fn test_analyze_missing_values_sorted_descending() {
    let df = df! {
        "a" => [Some(1i32), None, Some(3), Some(4)],
        "b" => [None::<i32>, None, None, Some(4)],
        "c" => [1i32, 2, 3, 4],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df);

    let names: Vec<&str> = ratios.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn test_empty_dataframe() {
    let df = DataFrame::empty();
    assert!(analyze_missing_values(&df).is_empty());
}

#[test]
fn test_drop_incomplete_rows_any_column() {
    let df = df! {
        "id" => [Some("r0"), None, Some("r2"), Some("r3")],
        "value" => [Some(1.0f64), Some(2.0), None, Some(4.0)],
    }
    .unwrap();

    let (complete, kept_rows) = drop_incomplete_rows(&df).unwrap();

    assert_eq!(kept_rows, vec![0, 3]);
    common::assert_shape(&complete, 2, 2);
    assert_eq!(common::f64_values(&complete, "value"), vec![1.0, 4.0]);
}

#[test]
fn test_drop_incomplete_rows_noop_when_complete() {
    let df = common::create_runs_dataframe();

    let (complete, kept_rows) = drop_incomplete_rows(&df).unwrap();

    assert_eq!(kept_rows, vec![0, 1, 2]);
    assert!(complete.equals(&df), "Complete table should pass through unchanged");
}

#[test]
fn test_completeness_invariant() {
    let df = df! {
        "a" => [Some(1i32), None, Some(3), Some(4), None, Some(6)],
        "b" => [Some(1.0f64), Some(2.0), None, Some(4.0), None, Some(6.0)],
        "c" => [Some("x"), Some("y"), Some("z"), None, Some("v"), Some("w")],
    }
    .unwrap();

    let (complete, kept_rows) = drop_incomplete_rows(&df).unwrap();

    // Nothing missing survives
    for column in complete.get_columns() {
        assert_eq!(column.null_count(), 0, "Column {} has nulls", column.name());
    }

    // Exactly the rows with a missing cell are gone
    assert_eq!(kept_rows, vec![0, 5]);
    for row in 0..df.height() {
        let has_missing = df
            .get_columns()
            .iter()
            .any(|column| column.get(row).unwrap().is_null());
        assert_eq!(has_missing, !kept_rows.contains(&row), "Row {} misclassified", row);
    }
}

#[test]
fn test_row_count_equal_iff_nothing_missing() {
    let complete_input = common::create_runs_dataframe();
    let (out, _) = drop_incomplete_rows(&complete_input).unwrap();
    assert_eq!(out.height(), complete_input.height());

    let incomplete_input = df! {
        "a" => [Some(1.0f64), None],
    }
    .unwrap();
    let (out, _) = drop_incomplete_rows(&incomplete_input).unwrap();
    assert!(out.height() < incomplete_input.height());
}

#[test]
fn test_source_row_falls_back_to_position() {
    let kept_rows = vec![0, 2, 5];

    assert_eq!(source_row(&kept_rows, 1), 2);
    assert_eq!(source_row(&kept_rows, 2), 5);
    assert_eq!(source_row(&[], 4), 4);
}
