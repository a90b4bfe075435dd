//! End-to-end tests: load → annotate → chart data → report/export

use biofuel_metrics::charts::{build_run_charts, ChartConfig};
use biofuel_metrics::pipeline::{
    annotate, annotate_runs, load_with_report, PipelineError, ZeroInputPolicy, RESOURCE_EFFICIENCY,
    TOTAL_RESOURCE_INPUT,
};
use biofuel_metrics::report::{export_metrics, MetricsExport, RunMetrics, RunSummary};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_worked_example() {
    let (_dir, path) = common::write_temp_csv(common::EXAMPLE_CSV);

    let (df, report) = load_with_report(&path).unwrap();
    assert_eq!(report.rows_dropped, 1);
    assert_eq!(report.source_rows, vec![0, 2]);

    let df = annotate_runs(df, &report.source_rows, ZeroInputPolicy::Propagate).unwrap();

    let total = common::f64_values(&df, TOTAL_RESOURCE_INPUT);
    let efficiency = common::f64_values(&df, RESOURCE_EFFICIENCY);
    assert_eq!(total, vec![10.0, 0.0]);
    common::assert_close(efficiency[0], 2.0);
    assert!(efficiency[1].is_infinite());

    let charts = build_run_charts(&df, &report.source_rows, &ChartConfig::default()).unwrap();
    // Bars keep the source row index of each run
    assert_eq!(charts.usage.categories, vec!["0", "2"]);
    assert_eq!(charts.yield_scatter.points, vec![(10.0, 20.0), (0.0, 5.0)]);
}

#[test]
fn test_worked_example_with_error_policy() {
    let (_dir, path) = common::write_temp_csv(common::EXAMPLE_CSV);
    let (df, report) = load_with_report(&path).unwrap();

    let result = annotate_runs(df, &report.source_rows, ZeroInputPolicy::Error);

    // The all-zero run is data row 2 of the source
    assert!(matches!(result, Err(PipelineError::DivisionByZero { row: 2 })));
}

#[test]
fn test_run_summary_from_example() {
    let (_dir, path) = common::write_temp_csv(common::EXAMPLE_CSV);
    let (df, report) = load_with_report(&path).unwrap();
    let df = annotate_runs(df, &report.source_rows, ZeroInputPolicy::Propagate).unwrap();

    let summary = RunSummary::new(report, &df).unwrap();

    assert_eq!(summary.runs.len(), 2);
    assert_eq!(summary.runs[1].run, 2);
    assert_eq!(summary.efficiency.non_finite_runs, 1);
    assert_eq!(summary.efficiency.best_run, Some((0, 2.0)));

    let overview = summary.overview_table().to_string();
    assert!(overview.contains("Rows Read"));
    assert!(overview.contains("Undefined Efficiency"));

    let runs = summary.runs_table().to_string();
    assert!(runs.contains("Efficiency"));
    assert!(runs.contains("2.0000"));
    assert!(runs.contains("inf"));
}

#[test]
fn test_run_metrics_from_table() {
    let df = annotate(common::create_runs_dataframe(), ZeroInputPolicy::Propagate).unwrap();

    let runs = RunMetrics::from_table(&df, &[]).unwrap();

    assert_eq!(runs.len(), 3);
    assert_eq!(runs[1].run, 1);
    assert_eq!(runs[1].total_resource_input, 20.0);
    common::assert_close(runs[1].resource_efficiency, 2.5);
}

#[test]
fn test_export_json() {
    let (dir, path) = common::write_temp_csv(common::EXAMPLE_CSV);
    let (df, report) = load_with_report(&path).unwrap();
    let mut df = annotate(df, ZeroInputPolicy::Propagate).unwrap();
    let export = MetricsExport::new(&path, ZeroInputPolicy::Propagate, &report, &df).unwrap();
    let out = dir.path().join("metrics.json");

    export_metrics(&mut df, &export, &out).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["metadata"]["zero_input_policy"], "propagate");
    assert_eq!(json["counts"]["rows_read"], 3);
    assert_eq!(json["counts"]["rows_dropped"], 1);
    assert_eq!(json["runs"].as_array().unwrap().len(), 2);
    assert_eq!(json["runs"][1]["run"], 2);
    assert_eq!(json["runs"][0]["resource_efficiency"], 2.0);
    assert!(json["runs"][1]["resource_efficiency"].is_null());
    assert_eq!(json["efficiency"]["non_finite_runs"], 1);
}

#[test]
fn test_export_csv_round_trips_table() {
    let (dir, path) = common::write_temp_csv(common::EXAMPLE_CSV);
    let (df, report) = load_with_report(&path).unwrap();
    let mut df = annotate(df, ZeroInputPolicy::Propagate).unwrap();
    let export = MetricsExport::new(&path, ZeroInputPolicy::Propagate, &report, &df).unwrap();
    let out = dir.path().join("annotated.csv");

    export_metrics(&mut df, &export, &out).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    let header = written.lines().next().unwrap();
    assert!(header.ends_with("Total_Resource_Input,Resource_Efficiency"));
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn test_export_unsupported_extension() {
    let (dir, _) = common::write_temp_csv("");
    let mut df = annotate(common::create_runs_dataframe(), ZeroInputPolicy::Propagate).unwrap();
    let export = MetricsExport::new(
        std::path::Path::new("runs.csv"),
        ZeroInputPolicy::Propagate,
        &Default::default(),
        &df,
    )
    .unwrap();

    let result = export_metrics(&mut df, &export, &dir.path().join("metrics.xlsx"));

    let err = result.unwrap_err().to_string();
    assert!(err.contains("Unsupported export format"), "{}", err);
}

#[test]
fn test_row_count_preserved_through_calculator() {
    let csv = format!(
        "{}\n1,2,3,4\n5,6,7,8\n9,10,11,12\n13,,15,16\n",
        common::RAW_HEADER
    );
    let (_dir, path) = common::write_temp_csv(&csv);
    let (df, report) = load_with_report(&path).unwrap();
    let rows_before = df.height();

    let df: DataFrame = annotate(df, ZeroInputPolicy::Propagate).unwrap();

    assert_eq!(df.height(), rows_before);
    assert_eq!(report.rows_kept(), rows_before);
    assert_eq!(rows_before, 3);
}
