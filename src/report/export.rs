//! Metrics export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use super::summary::RunMetrics;
use crate::pipeline::{EfficiencySummary, LoadReport, ZeroInputPolicy};

/// Metadata about the run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    /// Tool version
    pub version: String,
    /// Input file path
    pub input_file: String,
    /// How zero total resource input was handled
    pub zero_input_policy: String,
}

/// Row accounting from the loader
#[derive(Serialize)]
pub struct ExportCounts {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub rows_analyzed: usize,
}

/// Complete metrics export
#[derive(Serialize)]
pub struct MetricsExport {
    pub metadata: ExportMetadata,
    pub counts: ExportCounts,
    pub efficiency: EfficiencySummary,
    pub runs: Vec<RunMetrics>,
}

impl MetricsExport {
    pub fn new(
        input_file: &Path,
        policy: ZeroInputPolicy,
        load: &LoadReport,
        df: &DataFrame,
    ) -> Result<Self> {
        Ok(Self {
            metadata: ExportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                zero_input_policy: policy.to_string(),
            },
            counts: ExportCounts {
                rows_read: load.rows_read,
                rows_dropped: load.rows_dropped,
                rows_analyzed: load.rows_kept(),
            },
            efficiency: EfficiencySummary::from_table(df, &load.source_rows)?,
            runs: RunMetrics::from_table(df, &load.source_rows)?,
        })
    }
}

/// Export the annotated table (`.csv`) or the metrics report (`.json`)
pub fn export_metrics(
    df: &mut DataFrame,
    export: &MetricsExport,
    output_path: &Path,
) -> Result<()> {
    let extension = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(output_path).with_context(|| {
                format!("Failed to create output file: {}", output_path.display())
            })?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", output_path.display()))?;
        }
        "json" => {
            let json = serde_json::to_string_pretty(export)
                .context("Failed to serialize metrics to JSON")?;
            std::fs::write(output_path, json).with_context(|| {
                format!("Failed to write metrics JSON to {}", output_path.display())
            })?;
        }
        _ => anyhow::bail!(
            "Unsupported export format: {}. Supported formats: csv, json",
            extension
        ),
    }

    Ok(())
}
