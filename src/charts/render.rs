//! Chart rendering with plotters
//!
//! Draws a `ResourceCharts` description onto one surface split vertically:
//! the grouped resource-usage bars on top, input-vs-yield scatter below.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::figure::{GroupedBarChart, ResourceCharts, ScatterChart};

/// Default surface size in pixels (10 x 12 inches at 100 dpi)
pub const DEFAULT_CHART_SIZE: (u32, u32) = (1000, 1200);

const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
];
const SCATTER_COLOR: RGBColor = RGBColor(255, 165, 0);

/// Fraction of a category slot covered by its bar group
const GROUP_WIDTH: f64 = 0.8;

/// Render both charts to an image file.
///
/// `.svg` uses the SVG backend; `.png`, `.bmp`, `.jpg` and `.jpeg` the bitmap backend.
pub fn render_charts(charts: &ResourceCharts, path: &Path, size: (u32, u32)) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let rendered = match extension.as_str() {
        "svg" => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_charts(root, charts)
        }
        "png" | "bmp" | "jpg" | "jpeg" => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_charts(root, charts)
        }
        _ => anyhow::bail!(
            "Unsupported chart format: {}. Supported formats: png, svg, bmp, jpg",
            extension
        ),
    };
    rendered.with_context(|| format!("Failed to render charts to {}", path.display()))
}

/// Hand a rendered chart file to the system's default viewer
pub fn present(path: &Path) -> Result<()> {
    open::that(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn draw_charts<DB>(root: DrawingArea<DB, Shift>, charts: &ResourceCharts) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 1));
    draw_grouped_bars(&panels[0], &charts.usage)?;
    draw_scatter(&panels[1], &charts.yield_scatter)?;

    root.present()?;
    Ok(())
}

fn draw_grouped_bars<DB>(area: &DrawingArea<DB, Shift>, data: &GroupedBarChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = data.categories.len().max(1);
    let (y_min, y_max) = data.value_range();
    let (y_min, y_max) = padded(y_min, y_max);
    // Bars grow from zero, so only pad away from it
    let y_min = if y_min < 0.0 { y_min } else { 0.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(&data.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), y_min..y_max)?;

    let categories = &data.categories;
    let category_label = |x: &f64| {
        let index = x.round();
        if (x - index).abs() < 1e-6 && index >= 0.0 && (index as usize) < categories.len() {
            categories[index as usize].clone()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(30) + 1)
        .x_label_formatter(&category_label)
        .x_desc(data.x_label.as_str())
        .y_desc(data.y_label.as_str())
        .draw()?;

    let bar_width = GROUP_WIDTH / data.series.len().max(1) as f64;

    for (j, series) in data.series.iter().enumerate() {
        let color = SERIES_COLORS[j % SERIES_COLORS.len()];
        let bars = series
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(move |(i, &v)| {
                let x0 = i as f64 - GROUP_WIDTH / 2.0 + j as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled())
            });

        chart
            .draw_series(bars)?
            .label(series.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_scatter<DB>(area: &DrawingArea<DB, Shift>, data: &ScatterChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_lo, x_hi) = data.x_range();
    let (y_lo, y_hi) = data.y_range();
    let (x_min, x_max) = padded(x_lo, x_hi);
    let (y_min, y_max) = padded(y_lo, y_hi);

    let mut chart = ChartBuilder::on(area)
        .caption(&data.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(data.x_label.as_str())
        .y_desc(data.y_label.as_str())
        .draw()?;

    chart.draw_series(
        data.finite_points()
            .map(|(x, y)| Circle::new((x, y), 4, SCATTER_COLOR.filled())),
    )?;

    Ok(())
}

/// Widen a range by 5% on each side; a degenerate range gets a unit margin.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo - span * 0.05, hi + span * 0.05)
    }
}
