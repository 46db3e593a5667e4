/// Text report: per-day tables and whole-series summary.
///
/// Output layout:
///
/// ```text
/// Station: Charleston, Cooper River Entrance (8665530)
/// Source: NOAA CO-OPS predictions
///
/// Saturday, September 07, 2024 | high 6.88 ft at 03:00, low 5.63 ft at 00:00
///   00:00 - 5.63 ft
///   03:00 - 6.88 ft
///
/// Summary over 2 observations
///   max=6.88 ft, min=5.63 ft, mean=6.26 ft, sd=0.88 ft
/// ```

use std::io::{self, Write};

use chrono::NaiveDate;

use crate::analysis::groupings::{group_by_day, DayGroup};
use crate::analysis::summary::{round2, SummaryStats};
use crate::model::{DataOrigin, Observation, ObservationSet};

pub const NO_DATA_MESSAGE: &str = "no data to display";

/// Which observations of each day get a line of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    All,
    /// Every n-th observation of the day, starting with the first.
    Stride(usize),
}

impl DisplayMode {
    /// A stride of 0 or 1 means "show everything".
    pub fn from_stride(stride: usize) -> Self {
        if stride <= 1 {
            DisplayMode::All
        } else {
            DisplayMode::Stride(stride)
        }
    }

    pub fn select<'a>(&self, observations: &'a [Observation]) -> Vec<&'a Observation> {
        match *self {
            DisplayMode::All => observations.iter().collect(),
            DisplayMode::Stride(n) => observations.iter().step_by(n.max(1)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub display: DisplayMode,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { display: DisplayMode::All }
    }
}

/// What `write_report` ended up printing.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Printed(SummaryStats),
    NoData,
}

// ---------------------------------------------------------------------------
// Line formatting
// ---------------------------------------------------------------------------

/// e.g. `Saturday, September 07, 2024`
pub fn format_day_header(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

/// e.g. `  03:00 - 6.88 ft`
pub fn format_observation_line(obs: &Observation) -> String {
    format!("  {} - {:.2} ft", obs.timestamp.format("%H:%M"), round2(obs.height_ft))
}

fn format_day_extremes(group: &DayGroup) -> Option<String> {
    let high = group.high()?;
    let low = group.low()?;
    Some(format!(
        "high {:.2} ft at {}, low {:.2} ft at {}",
        round2(high.height_ft),
        high.timestamp.format("%H:%M"),
        round2(low.height_ft),
        low.timestamp.format("%H:%M"),
    ))
}

pub fn format_summary(stats: &SummaryStats) -> String {
    let sd = stats
        .std_dev
        .map(|sd| format!("{:.2} ft", round2(sd)))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "max={:.2} ft, min={:.2} ft, mean={:.2} ft, sd={}",
        round2(stats.max),
        round2(stats.min),
        round2(stats.mean),
        sd
    )
}

fn format_source(origin: &DataOrigin) -> String {
    match origin {
        DataOrigin::Live => "Source: NOAA CO-OPS predictions".to_string(),
        DataOrigin::Synthetic { reason } => format!("Source: SYNTHETIC data ({})", reason),
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Writes the full report for `set` to `out`.
///
/// An empty set prints only `no data to display`; no grouping or statistics
/// are attempted.
pub fn write_report<W: Write>(
    set: &ObservationSet,
    options: &ReportOptions,
    out: &mut W,
) -> io::Result<ReportOutcome> {
    let stats = match SummaryStats::from_values(&set.heights()) {
        Some(stats) => stats,
        None => {
            writeln!(out, "{}", NO_DATA_MESSAGE)?;
            return Ok(ReportOutcome::NoData);
        }
    };

    if let Some(meta) = &set.metadata {
        writeln!(out, "Station: {} ({})", meta.name, meta.id)?;
    }
    writeln!(out, "{}", format_source(&set.origin))?;
    if set.skipped_rows > 0 {
        writeln!(out, "Rows dropped while parsing: {}", set.skipped_rows)?;
    }

    for group in group_by_day(&set.observations) {
        writeln!(out)?;
        match format_day_extremes(&group) {
            Some(extremes) => writeln!(out, "{} | {}", format_day_header(group.date), extremes)?,
            None => writeln!(out, "{}", format_day_header(group.date))?,
        }
        for obs in options.display.select(&group.observations) {
            writeln!(out, "{}", format_observation_line(obs))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Summary over {} observations", stats.count)?;
    writeln!(out, "  {}", format_summary(&stats))?;

    Ok(ReportOutcome::Printed(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::coops::parse_json;
    use crate::ingest::fixtures::*;

    fn render(set: &ObservationSet, options: &ReportOptions) -> (String, ReportOutcome) {
        let mut buf = Vec::new();
        let outcome = write_report(set, options, &mut buf).expect("writing to a Vec cannot fail");
        (String::from_utf8(buf).unwrap(), outcome)
    }

    #[test]
    fn test_two_prediction_scenario() {
        let set = parse_json(fixture_two_predictions_json()).unwrap();
        let (text, outcome) = render(&set, &ReportOptions::default());

        assert!(matches!(outcome, ReportOutcome::Printed(_)));
        assert_eq!(text.matches("Saturday, September 07, 2024").count(), 1, "{}", text);
        assert!(text.contains("  00:00 - 5.63 ft\n"), "{}", text);
        assert!(text.contains("  03:00 - 6.88 ft\n"), "{}", text);
        assert!(text.contains("max=6.88 ft, min=5.63 ft, mean=6.26 ft"), "{}", text);

        let observation_lines = text.lines().filter(|l| l.contains(" - ") && l.ends_with(" ft")).count();
        assert_eq!(observation_lines, 2);
    }

    #[test]
    fn test_empty_set_prints_no_data_only() {
        let set = ObservationSet {
            metadata: None,
            observations: vec![],
            origin: DataOrigin::Live,
            skipped_rows: 0,
        };
        let (text, outcome) = render(&set, &ReportOptions::default());
        assert_eq!(outcome, ReportOutcome::NoData);
        assert_eq!(text, "no data to display\n");
    }

    #[test]
    fn test_stride_samples_each_day() {
        let set = parse_json(fixture_two_day_json()).unwrap();
        let options = ReportOptions { display: DisplayMode::Stride(2) };
        let (text, _) = render(&set, &options);

        // Day 1: 22:00 (23:00 skipped). Day 2: 00:00, 02:00 (01:00 skipped).
        assert!(text.contains("  22:00 - 3.10 ft"));
        assert!(!text.contains("  23:00 -"));
        assert!(text.contains("  00:00 - 5.02 ft"));
        assert!(!text.contains("  01:00 -"));
        assert!(text.contains("  02:00 - 5.60 ft"));
        // The summary still covers every observation.
        assert!(text.contains("Summary over 5 observations"));
    }

    #[test]
    fn test_synthetic_source_is_labelled() {
        let mut set = parse_json(fixture_two_predictions_json()).unwrap();
        set.origin = DataOrigin::Synthetic { reason: "request timed out".to_string() };
        let (text, _) = render(&set, &ReportOptions::default());
        assert!(text.contains("SYNTHETIC"));
    }

    #[test]
    fn test_dropped_rows_are_mentioned() {
        let set = parse_json(fixture_dirty_rows_json()).unwrap();
        let (text, _) = render(&set, &ReportOptions::default());
        assert!(text.contains("Rows dropped while parsing: 3"));
    }

    #[test]
    fn test_day_header_carries_extremes() {
        let set = parse_json(fixture_two_predictions_json()).unwrap();
        let (text, _) = render(&set, &ReportOptions::default());
        assert!(text.contains("Saturday, September 07, 2024 | high 6.88 ft at 03:00, low 5.63 ft at 00:00"));
    }

    #[test]
    fn test_single_observation_has_no_sd() {
        let stats = SummaryStats::from_values(&[4.2]).unwrap();
        assert_eq!(format_summary(&stats), "max=4.20 ft, min=4.20 ft, mean=4.20 ft, sd=n/a");
    }

    #[test]
    fn test_display_mode_from_stride() {
        assert_eq!(DisplayMode::from_stride(0), DisplayMode::All);
        assert_eq!(DisplayMode::from_stride(1), DisplayMode::All);
        assert_eq!(DisplayMode::from_stride(3), DisplayMode::Stride(3));
    }
}
