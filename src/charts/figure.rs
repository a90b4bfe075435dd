//! Chart data construction.
//!
//! Turns an annotated production run table into plain chart descriptions.
//! Nothing here touches a drawing backend, so the data behind each chart can be
//! inspected and tested on its own.

use polars::prelude::*;

use crate::pipeline::{
    ensure_columns, source_row, PipelineError, PipelineResult, BIOFUEL_YIELD, CATALYST_USAGE,
    ENERGY_CONSUMPTION, RAW_MATERIAL_INPUT, TOTAL_RESOURCE_INPUT,
};

/// Which columns to plot and how to label the two charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// `(column, legend label)` for each bar in a group, in drawing order
    pub bar_columns: Vec<(String, String)>,
    pub bar_title: String,
    pub bar_x_label: String,
    pub bar_y_label: String,
    pub scatter_x_column: String,
    pub scatter_y_column: String,
    pub scatter_title: String,
    pub scatter_x_label: String,
    pub scatter_y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_columns: vec![
                (CATALYST_USAGE.to_string(), "Catalyst".to_string()),
                (ENERGY_CONSUMPTION.to_string(), "Energy".to_string()),
                (RAW_MATERIAL_INPUT.to_string(), "Raw Material".to_string()),
            ],
            bar_title: "Comparison of Resource Usage".to_string(),
            bar_x_label: "Production Run".to_string(),
            bar_y_label: "Resource Amount".to_string(),
            scatter_x_column: TOTAL_RESOURCE_INPUT.to_string(),
            scatter_y_column: BIOFUEL_YIELD.to_string(),
            scatter_title: "Resource Input vs Biofuel Yield".to_string(),
            scatter_x_label: "Total Resource Input (kg/kWh)".to_string(),
            scatter_y_label: "Biofuel Yield (L)".to_string(),
        }
    }
}

/// One bar per category for a single legend entry
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Grouped bar chart: one group per category, one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl GroupedBarChart {
    /// Lowest and highest finite bar value, always including zero.
    pub fn value_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values.iter().copied());
        finite_bounds(values.chain(std::iter::once(0.0))).unwrap_or((0.0, 1.0))
    }
}

/// Scatter chart without connecting lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

impl ScatterChart {
    /// Points where both coordinates are finite
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }

    pub fn x_range(&self) -> (f64, f64) {
        finite_bounds(self.finite_points().map(|(x, _)| x)).unwrap_or((0.0, 1.0))
    }

    pub fn y_range(&self) -> (f64, f64) {
        finite_bounds(self.finite_points().map(|(_, y)| y)).unwrap_or((0.0, 1.0))
    }
}

/// Both charts, stacked top (bar) to bottom (scatter) when drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCharts {
    pub usage: GroupedBarChart,
    pub yield_scatter: ScatterChart,
}

/// Build both chart descriptions from an annotated table, labelling each bar
/// group with the run's position in `df`.
///
/// Fails with `EmptyTable` when there is nothing to plot, and with
/// `MissingColumn` when a configured column is absent.
pub fn build_charts(df: &DataFrame, config: &ChartConfig) -> PipelineResult<ResourceCharts> {
    build_run_charts(df, &[], config)
}

/// Same as [`build_charts`], labelling bar groups with the source row of each
/// run so dropped rows leave gaps in the category axis.
pub fn build_run_charts(
    df: &DataFrame,
    source_rows: &[usize],
    config: &ChartConfig,
) -> PipelineResult<ResourceCharts> {
    if df.height() == 0 {
        return Err(PipelineError::EmptyTable);
    }

    let mut required: Vec<&str> = config.bar_columns.iter().map(|(c, _)| c.as_str()).collect();
    required.push(&config.scatter_x_column);
    required.push(&config.scatter_y_column);
    ensure_columns(df, &required)?;

    let series = config
        .bar_columns
        .iter()
        .map(|(column, label)| {
            Ok(BarSeries {
                label: label.clone(),
                values: column_values(df, column)?,
            })
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    let usage = GroupedBarChart {
        title: config.bar_title.clone(),
        x_label: config.bar_x_label.clone(),
        y_label: config.bar_y_label.clone(),
        categories: (0..df.height())
            .map(|i| source_row(source_rows, i).to_string())
            .collect(),
        series,
    };

    let xs = column_values(df, &config.scatter_x_column)?;
    let ys = column_values(df, &config.scatter_y_column)?;
    let yield_scatter = ScatterChart {
        title: config.scatter_title.clone(),
        x_label: config.scatter_x_label.clone(),
        y_label: config.scatter_y_label.clone(),
        points: xs.into_iter().zip(ys).collect(),
    };

    Ok(ResourceCharts {
        usage,
        yield_scatter,
    })
}

/// Column as `f64` values; nulls become `NaN` and are skipped when drawing.
fn column_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn finite_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
