//! Biofuel Metrics CLI
//!
//! Loads production runs, derives resource-efficiency metrics and renders the
//! resource usage and input-vs-yield charts.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use biofuel_metrics::charts::{build_run_charts, present, render_charts, ChartConfig};
use biofuel_metrics::cli::{Cli, Commands};
use biofuel_metrics::pipeline::{annotate_runs, get_column_names, load_with_report};
use biofuel_metrics::report::{export_metrics, MetricsExport, RunSummary};
use biofuel_metrics::utils::{
    abandon, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return match command {
            Commands::Columns { input } => list_columns(input),
        };
    }

    let chart_path = cli.chart_output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &chart_path, cli.export.as_deref(), cli.zero_input);

    // Step 1: Load and clean
    print_step_header(1, "Load Production Runs");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading CSV...");
    let (df, load_report) = match load_with_report(&cli.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            abandon(&spinner);
            return Err(e.into());
        }
    };
    finish_with_success(&spinner, "Production runs loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", load_report.rows_read);
    println!("      Columns: {}", load_report.columns);
    if load_report.rows_dropped > 0 {
        print_count(
            "incomplete row(s)",
            load_report.rows_dropped,
            Some("(dropped)"),
        );
    } else {
        print_info("No rows with missing values");
    }
    print_step_time(step_start.elapsed());

    // Step 2: Metrics
    print_step_header(2, "Resource Efficiency Metrics");
    let step_start = Instant::now();
    let spinner = create_spinner("Calculating total input and efficiency...");
    let mut df = match annotate_runs(df, &load_report.source_rows, cli.zero_input) {
        Ok(df) => df,
        Err(e) => {
            abandon(&spinner);
            return Err(e.into());
        }
    };
    let summary = RunSummary::new(load_report.clone(), &df)?;
    if summary.efficiency.non_finite_runs > 0 {
        finish_with_warning(
            &spinner,
            &format!(
                "{} run(s) have zero total resource input",
                summary.efficiency.non_finite_runs
            ),
        );
    } else {
        finish_with_success(&spinner, "Metrics calculated");
    }
    print_step_time(step_start.elapsed());

    // Step 3: Charts
    print_step_header(3, "Visualize");
    let step_start = Instant::now();
    let charts = build_run_charts(&df, &load_report.source_rows, &ChartConfig::default())?;
    let spinner = create_spinner("Rendering charts...");
    if let Err(e) = render_charts(&charts, &chart_path, cli.chart_size()) {
        abandon(&spinner);
        return Err(e);
    }
    finish_with_success(
        &spinner,
        &format!("Charts saved to {}", chart_path.display()),
    );
    if cli.no_open {
        print_info("Skipping chart viewer (--no-open)");
    } else if let Err(e) = present(&chart_path) {
        print_warning(&format!("{:#}", e));
    }
    print_step_time(step_start.elapsed());

    // Optional export
    if let Some(export_path) = &cli.export {
        print_step_header(4, "Export Metrics");
        let step_start = Instant::now();
        let export = MetricsExport::new(&cli.input, cli.zero_input, &load_report, &df)?;
        export_metrics(&mut df, &export, export_path)?;
        print_success(&format!("Metrics written to {}", export_path.display()));
        print_step_time(step_start.elapsed());
    }

    summary.display();
    print_completion();

    Ok(())
}

/// Print the normalized column names of a CSV file
fn list_columns(input: &Path) -> Result<()> {
    let columns = get_column_names(input)?;
    println!(
        "\n {} Columns in {}",
        style("◆").cyan().bold(),
        style(input.display()).dim()
    );
    for (i, column) in columns.iter().enumerate() {
        println!("   {:>3}. {}", i + 1, column);
    }
    println!();
    Ok(())
}
