//! Run summary report

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{
    source_row, EfficiencySummary, LoadReport, BIOFUEL_YIELD, CATALYST_USAGE, ENERGY_CONSUMPTION,
    RAW_MATERIAL_INPUT, RESOURCE_EFFICIENCY, TOTAL_RESOURCE_INPUT,
};

/// Per-run table is truncated after this many rows
pub const MAX_DISPLAY_RUNS: usize = 25;

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub load: LoadReport,
    pub efficiency: EfficiencySummary,
    pub runs: Vec<RunMetrics>,
}

/// Inputs and derived metrics of one production run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RunMetrics {
    /// 0-based data row of the run in the source file
    pub run: usize,
    pub catalyst_usage_kg: f64,
    pub energy_consumption_kwh: f64,
    pub raw_material_input_kg: f64,
    pub biofuel_yield_l: f64,
    pub total_resource_input: f64,
    /// Serialized as `null` when the efficiency is not a finite number
    #[serde(serialize_with = "serialize_finite")]
    pub resource_efficiency: f64,
}

fn serialize_finite<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

impl RunMetrics {
    /// Read every run from an annotated table, numbered by `source_rows`
    /// (or by position when none are recorded)
    pub fn from_table(df: &DataFrame, source_rows: &[usize]) -> PolarsResult<Vec<RunMetrics>> {
        let column = |name: &str| -> PolarsResult<Vec<f64>> {
            let values = df.column(name)?.cast(&DataType::Float64)?;
            Ok(values
                .f64()?
                .iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect())
        };

        let catalyst = column(CATALYST_USAGE)?;
        let energy = column(ENERGY_CONSUMPTION)?;
        let raw = column(RAW_MATERIAL_INPUT)?;
        let biofuel = column(BIOFUEL_YIELD)?;
        let total = column(TOTAL_RESOURCE_INPUT)?;
        let efficiency = column(RESOURCE_EFFICIENCY)?;

        Ok((0..df.height())
            .map(|i| RunMetrics {
                run: source_row(source_rows, i),
                catalyst_usage_kg: catalyst[i],
                energy_consumption_kwh: energy[i],
                raw_material_input_kg: raw[i],
                biofuel_yield_l: biofuel[i],
                total_resource_input: total[i],
                resource_efficiency: efficiency[i],
            })
            .collect())
    }
}

impl RunSummary {
    pub fn new(load: LoadReport, df: &DataFrame) -> Result<Self> {
        Ok(Self {
            efficiency: EfficiencySummary::from_table(df, &load.source_rows)?,
            runs: RunMetrics::from_table(df, &load.source_rows)?,
            load,
        })
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        print_indented(&self.overview_table());

        if !self.runs.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("⚗️").cyan(),
                style("PRODUCTION RUNS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            println!();
            print_indented(&self.runs_table());

            if self.runs.len() > MAX_DISPLAY_RUNS {
                println!(
                    "      {}",
                    style(format!(
                        "... {} more run(s) not shown",
                        self.runs.len() - MAX_DISPLAY_RUNS
                    ))
                    .dim()
                );
            }
        }

        let incomplete: Vec<&(String, f64)> = self
            .load
            .missing_by_column
            .iter()
            .filter(|(_, ratio)| *ratio > 0.0)
            .collect();
        if !incomplete.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Columns with missing values").yellow(),
                style(format!("({})", incomplete.len())).dim()
            );
            for (column, ratio) in incomplete {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    column,
                    style(format!("({:.1}% missing)", ratio * 100.0)).dim()
                );
            }
        }
    }

    /// Metric / value table with load counts and efficiency headline numbers
    pub fn overview_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows Read"),
            Cell::new(self.load.rows_read),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Missing)"),
            Cell::new(self.load.rows_dropped).fg(if self.load.rows_dropped == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Runs Analyzed"),
            Cell::new(self.load.rows_kept())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("📊 Columns"),
            Cell::new(self.load.columns),
        ]);

        table.add_row(vec![
            Cell::new("⚡ Mean Efficiency"),
            Cell::new(
                self.efficiency
                    .mean_efficiency
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| "-".to_string()),
            )
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🏆 Best Run"),
            Cell::new(format_run(self.efficiency.best_run)),
        ]);
        table.add_row(vec![
            Cell::new("🐢 Worst Run"),
            Cell::new(format_run(self.efficiency.worst_run)),
        ]);

        if self.efficiency.non_finite_runs > 0 {
            table.add_row(vec![
                Cell::new("⚠️  Undefined Efficiency"),
                Cell::new(self.efficiency.non_finite_runs).fg(Color::Yellow),
            ]);
        }

        table
    }

    /// One row per production run, capped at `MAX_DISPLAY_RUNS`
    pub fn runs_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(
            [
                "Run",
                "Catalyst",
                "Energy",
                "Raw Material",
                "Yield",
                "Total",
                "Efficiency",
            ]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for run in self.runs.iter().take(MAX_DISPLAY_RUNS) {
            let efficiency = if run.resource_efficiency.is_finite() {
                Cell::new(format!("{:.4}", run.resource_efficiency))
            } else {
                Cell::new(format!("{}", run.resource_efficiency)).fg(Color::Yellow)
            };

            table.add_row(vec![
                Cell::new(run.run),
                number_cell(run.catalyst_usage_kg),
                number_cell(run.energy_consumption_kwh),
                number_cell(run.raw_material_input_kg),
                number_cell(run.biofuel_yield_l),
                number_cell(run.total_resource_input),
                efficiency.set_alignment(CellAlignment::Right),
            ]);
        }

        table
    }
}

fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}

fn format_run(run: Option<(usize, f64)>) -> String {
    match run {
        Some((index, efficiency)) => format!("#{} ({:.4})", index, efficiency),
        None => "-".to_string(),
    }
}

// Indent the table
fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
