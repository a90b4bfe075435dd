//! Charts module - chart construction and rendering

mod figure;
mod render;

pub use figure::{
    build_charts, build_run_charts, BarSeries, ChartConfig, GroupedBarChart, ResourceCharts,
    ScatterChart,
};
pub use render::{present, render_charts, DEFAULT_CHART_SIZE};
