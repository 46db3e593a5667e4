/// Tide chart rendering (PNG via plotters).
///
/// Height is drawn against hours since the first observation; tick labels
/// are formatted back into local date/time. Any backend failure, including
/// a panic inside plotters (missing fonts, unwritable path), comes back as
/// `TideError::Plot` so the text report is never affected.

use std::panic;
use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use plotters::prelude::*;
use tracing::info;

use crate::analysis::summary::SummaryStats;
use crate::config::PlotConfig;
use crate::model::{ObservationSet, TideError};

/// Vertical breathing room above and below the data, in feet.
const Y_PADDING_FT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub path: PathBuf,
    pub markers: bool,
    pub width: u32,
    pub height: u32,
}

impl From<&PlotConfig> for PlotOptions {
    fn from(config: &PlotConfig) -> Self {
        Self {
            path: config.path.clone(),
            markers: config.markers,
            width: config.width,
            height: config.height,
        }
    }
}

fn plot_error<E: std::fmt::Display>(e: E) -> TideError {
    TideError::Plot(e.to_string())
}

fn hours_since(start: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - start).num_seconds() as f64 / 3600.0
}

fn chart_title(set: &ObservationSet) -> String {
    let station = set
        .metadata
        .as_ref()
        .map(|m| format!("{} ({})", m.name, m.id))
        .unwrap_or_else(|| "Tide predictions".to_string());

    if set.is_synthetic() {
        format!("{} - SYNTHETIC", station)
    } else {
        station
    }
}

/// Renders `set` to `options.path`.
///
/// # Errors
/// `TideError::Plot` for an empty series or any drawing/encoding failure.
pub fn render_plot(set: &ObservationSet, options: &PlotOptions) -> Result<(), TideError> {
    if set.is_empty() {
        return Err(TideError::Plot("nothing to plot: series is empty".to_string()));
    }

    panic::catch_unwind(panic::AssertUnwindSafe(|| draw(set, options)))
        .map_err(|_| TideError::Plot("plotting backend panicked".to_string()))??;

    info!(path = %options.path.display(), points = set.len(), "wrote tide chart");
    Ok(())
}

fn draw(set: &ObservationSet, options: &PlotOptions) -> Result<(), TideError> {
    let stats = SummaryStats::from_values(&set.heights())
        .ok_or_else(|| TideError::Plot("nothing to plot: series is empty".to_string()))?;
    let start = set.observations[0].timestamp;

    let points: Vec<(f64, f64)> = set
        .observations
        .iter()
        .map(|o| (hours_since(start, o.timestamp), o.height_ft))
        .collect();
    let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);

    let root = BitMapBackend::new(&options.path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(set), ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, (stats.min - Y_PADDING_FT)..(stats.max + Y_PADDING_FT))
        .map_err(plot_error)?;

    let label_time = |x: &f64| {
        (start + Duration::minutes((x * 60.0).round() as i64))
            .format("%m-%d %H:%M")
            .to_string()
    };

    chart
        .configure_mesh()
        .x_desc("Local time")
        .y_desc("Height (ft above MLLW)")
        .x_label_formatter(&label_time)
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(plot_error)?;

    if options.markers {
        chart
            .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())))
            .map_err(plot_error)?;
    }

    root.present().map_err(plot_error)?;
    Ok(())
}
