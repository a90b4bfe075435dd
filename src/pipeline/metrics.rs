//! Resource-efficiency metrics
//!
//! Appends `Total_Resource_Input` and `Resource_Efficiency` to a production run
//! table. Each row is computed independently; row count and order never change.

use polars::prelude::*;

use super::columns::{
    ensure_columns, BIOFUEL_YIELD, REQUIRED_COLUMNS, RESOURCE_COLUMNS, RESOURCE_EFFICIENCY,
    TOTAL_RESOURCE_INPUT,
};
use super::error::{PipelineError, PipelineResult};
use super::missing::source_row;

/// What to do when a run's total resource input is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ZeroInputPolicy {
    /// Keep IEEE float semantics: positive yield gives `inf`, zero yield gives `NaN`
    #[default]
    Propagate,
    /// Fail with `DivisionByZero` naming the source row of the first offending run
    Error,
}

impl std::fmt::Display for ZeroInputPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroInputPolicy::Propagate => write!(f, "propagate"),
            ZeroInputPolicy::Error => write!(f, "error"),
        }
    }
}

/// Add the two derived metric columns to the table.
///
/// ```text
/// Total_Resource_Input = Catalyst_Usage_(kg) + Energy_Consumption_(kWh) + Raw_Material_Input_(kg)
/// Resource_Efficiency  = Biofuel_Yield_(L) / Total_Resource_Input
/// ```
///
/// Inputs are cast to `Float64` first. If the table already carries a column
/// with a derived name it is overwritten in place instead of duplicated.
///
/// Rows are identified by their position in `df`; use [`annotate_runs`] for a
/// table whose rows were filtered out of a larger source.
pub fn annotate(df: DataFrame, policy: ZeroInputPolicy) -> PipelineResult<DataFrame> {
    annotate_runs(df, &[], policy)
}

/// Same as [`annotate`], with `source_rows[i]` naming the source row of run `i`
/// (as recorded in `LoadReport::source_rows`).
pub fn annotate_runs(
    df: DataFrame,
    source_rows: &[usize],
    policy: ZeroInputPolicy,
) -> PipelineResult<DataFrame> {
    ensure_columns(&df, &REQUIRED_COLUMNS)?;
    ensure_numeric(&df)?;

    let [catalyst, energy, raw] = RESOURCE_COLUMNS.map(|name| col(name).cast(DataType::Float64));

    let annotated = df
        .lazy()
        .with_column((catalyst + energy + raw).alias(TOTAL_RESOURCE_INPUT))
        .with_column(
            (col(BIOFUEL_YIELD).cast(DataType::Float64) / col(TOTAL_RESOURCE_INPUT))
                .alias(RESOURCE_EFFICIENCY),
        )
        .collect()?;

    if policy == ZeroInputPolicy::Error {
        if let Some(position) = first_zero_input_row(&annotated)? {
            return Err(PipelineError::DivisionByZero {
                row: source_row(source_rows, position),
            });
        }
    }

    Ok(annotated)
}

/// Position of the first row whose total resource input is exactly zero
pub fn first_zero_input_row(df: &DataFrame) -> PipelineResult<Option<usize>> {
    let totals = df.column(TOTAL_RESOURCE_INPUT)?.f64()?;
    Ok(totals.iter().position(|v| v == Some(0.0)))
}

fn ensure_numeric(df: &DataFrame) -> PipelineResult<()> {
    for name in REQUIRED_COLUMNS {
        let dtype = df.column(name)?.dtype();
        if !(dtype.is_integer() || dtype.is_float()) {
            return Err(PipelineError::malformed(
                "<table>",
                format!("column '{}' is not numeric ({})", name, dtype),
            ));
        }
    }
    Ok(())
}

/// Headline numbers for the efficiency column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EfficiencySummary {
    pub runs: usize,
    /// Mean over finite efficiencies; `None` when there are none
    pub mean_efficiency: Option<f64>,
    /// `(source row, efficiency)` of the most efficient run
    pub best_run: Option<(usize, f64)>,
    /// `(source row, efficiency)` of the least efficient run
    pub worst_run: Option<(usize, f64)>,
    /// Runs whose efficiency is `inf` or `NaN`
    pub non_finite_runs: usize,
}

impl EfficiencySummary {
    /// Summarize an annotated table. Runs are reported by `source_rows`, or
    /// by position when none are recorded.
    pub fn from_table(df: &DataFrame, source_rows: &[usize]) -> PipelineResult<Self> {
        ensure_columns(df, &[RESOURCE_EFFICIENCY])?;
        let efficiencies = df.column(RESOURCE_EFFICIENCY)?.f64()?;

        let finite: Vec<(usize, f64)> = efficiencies
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                v.filter(|x| x.is_finite())
                    .map(|x| (source_row(source_rows, i), x))
            })
            .collect();

        let mean_efficiency = if finite.is_empty() {
            None
        } else {
            Some(finite.iter().map(|(_, v)| v).sum::<f64>() / finite.len() as f64)
        };

        // Earliest run wins ties
        let best_run = finite.iter().copied().fold(None, |acc, (i, v)| match acc {
            Some((_, best)) if best >= v => acc,
            _ => Some((i, v)),
        });
        let worst_run = finite.iter().copied().fold(None, |acc, (i, v)| match acc {
            Some((_, worst)) if worst <= v => acc,
            _ => Some((i, v)),
        });

        Ok(Self {
            runs: df.height(),
            mean_efficiency,
            best_run,
            worst_run,
            non_finite_runs: df.height() - finite.len(),
        })
    }
}
