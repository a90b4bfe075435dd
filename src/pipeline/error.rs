//! Error types for the production run pipeline.
//!
//! Every stage (loading, metrics, chart construction) reports failures through
//! `PipelineError`. None of them are recovered locally; the binary aborts the
//! run on the first error.

use std::io;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while loading, annotating or charting a run table.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source file could not be opened.
    #[error("Source not found: {path}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source is not a rectangular table with a header row.
    #[error("Malformed source {path}: {reason}")]
    MalformedSource { path: PathBuf, reason: String },

    /// A column required by the calculator or a chart is absent.
    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    /// No rows are left to plot.
    #[error("No production runs available to plot (table is empty)")]
    EmptyTable,

    /// A run has zero total resource input and the zero-input policy is `Error`.
    #[error("Total resource input is zero for production run {row}; efficiency is undefined")]
    DivisionByZero { row: usize },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PipelineError::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
