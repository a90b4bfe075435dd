//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::charts::DEFAULT_CHART_SIZE;
use crate::pipeline::ZeroInputPolicy;

/// Input file analyzed when no `--input` is given
pub const DEFAULT_INPUT: &str = "extra_3.csv";

/// Smallest accepted chart width or height in pixels
pub const MIN_CHART_DIMENSION: u32 = 200;

/// Biofuel Metrics - resource efficiency of catalytic conversion runs
#[derive(Parser, Debug)]
#[command(name = "biofuel-metrics")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input CSV file with one production run per row
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Chart image path (PNG or SVG, determined by extension).
    /// Defaults to the input directory with a '_charts.png' suffix (e.g., runs.csv → runs_charts.png).
    #[arg(short, long)]
    pub chart_output: Option<PathBuf>,

    /// How to treat runs whose total resource input is zero:
    /// "propagate" keeps inf/NaN efficiencies, "error" aborts the run
    #[arg(long, value_enum, default_value_t = ZeroInputPolicy::Propagate)]
    pub zero_input: ZeroInputPolicy,

    /// Export metrics to this path: '.csv' writes the annotated table,
    /// '.json' writes the per-run metrics report
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Render the charts without opening them in the system viewer
    #[arg(long, default_value = "false")]
    pub no_open: bool,

    /// Chart surface width in pixels
    #[arg(long, default_value_t = DEFAULT_CHART_SIZE.0, value_parser = validate_chart_dimension)]
    pub width: u32,

    /// Chart surface height in pixels
    #[arg(long, default_value_t = DEFAULT_CHART_SIZE.1, value_parser = validate_chart_dimension)]
    pub height: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the normalized column names of a CSV file
    Columns {
        /// Input CSV file
        input: PathBuf,
    },
}

impl Cli {
    /// Get the chart output path, deriving it from the input if not explicitly provided.
    pub fn chart_output_path(&self) -> PathBuf {
        self.chart_output.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("biofuel");
            parent.join(format!("{}_charts.png", stem))
        })
    }

    /// Chart surface size as `(width, height)`
    pub fn chart_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Validator for chart width and height
fn validate_chart_dimension(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid pixel count", s))?;

    if value < MIN_CHART_DIMENSION {
        Err(format!(
            "chart dimensions must be at least {} pixels, got {}",
            MIN_CHART_DIMENSION, value
        ))
    } else {
        Ok(value)
    }
}
