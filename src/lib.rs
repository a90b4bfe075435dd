//! Biofuel Metrics: Resource Efficiency Library
//!
//! Loads catalytic-conversion production runs from CSV, derives total resource
//! input and resource efficiency per run, and charts resource usage and yield.

pub mod charts;
pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
