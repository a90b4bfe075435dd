//! CLI module - argument parsing

mod args;

pub use args::{Cli, Commands, DEFAULT_INPUT, MIN_CHART_DIMENSION};
