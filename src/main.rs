//! Tide Prediction Report
//!
//! Fetches hourly tide predictions for one NOAA CO-OPS station, prints a
//! per-day table and summary statistics, and optionally writes a PNG chart.
//! When the API cannot be reached the report falls back to a clearly
//! labelled synthetic series (see `[fallback]` in tides.toml).
//!
//! Usage:
//!   cargo run --release                                # defaults from tides.toml
//!   cargo run --release -- --date 2024-09-10 --days 3  # window ending 2024-09-10
//!   cargo run --release -- --format csv --plot tides.png
//!
//! Environment:
//!   TIDEWATCH_CONFIG - alternative config file (also read from .env)
//!   RUST_LOG         - log filter, overrides -v

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, ValueHint};
use tracing::{error, warn};

use tidewatch::config::{load_config, resolve_config_path, AppConfig};
use tidewatch::ingest::mock;
use tidewatch::ingest::query::{parse_target_date, ResponseFormat, TideQuery};
use tidewatch::ingest::transport::HttpTransport;
use tidewatch::logging;
use tidewatch::model::{ObservationSet, TideError};
use tidewatch::pipeline::{FallbackPolicy, Pipeline};
use tidewatch::plot::{render_plot, PlotOptions};
use tidewatch::report::{write_report, DisplayMode, ReportOptions, ReportOutcome, NO_DATA_MESSAGE};

#[derive(Parser, Debug)]
#[command(name = "tidewatch", about = "NOAA tide prediction report")]
struct Cli {
    /// Last day of the window (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// CO-OPS station id
    #[arg(long)]
    station: Option<String>,

    /// Days of predictions ending at --date
    #[arg(long)]
    days: Option<u32>,

    /// Response format requested from the API
    #[arg(long)]
    format: Option<ResponseFormat>,

    /// Print every n-th observation per day (1 = all)
    #[arg(long)]
    stride: Option<usize>,

    /// Config file (default: $TIDEWATCH_CONFIG or tides.toml)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Write a PNG chart to this path
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "no_plot")]
    plot: Option<PathBuf>,

    /// Disable the chart even if tides.toml enables it
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Skip the network and report synthetic data
    #[arg(long, action = ArgAction::SetTrue)]
    mock: bool,

    /// When synthetic data may replace a failed fetch: never, transport, any
    #[arg(long)]
    fallback: Option<FallbackPolicy>,

    /// Debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_target_date(s).map_err(|e| e.to_string())
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(mut config: AppConfig, cli: &Cli) -> Result<AppConfig, TideError> {
    if let Some(station) = &cli.station {
        config.query.station_id = station.trim().to_string();
    }
    if let Some(days) = cli.days {
        config.query.lookback_days = days;
    }
    if let Some(format) = cli.format {
        config.query.format = format;
    }
    if let Some(stride) = cli.stride {
        config.report.stride = stride;
    }
    if let Some(policy) = cli.fallback {
        config.fallback.policy = policy;
    }
    if let Some(path) = &cli.plot {
        config.plot.enabled = true;
        config.plot.path = path.clone();
    }
    if cli.no_plot {
        config.plot.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

fn acquire(config: &AppConfig, query: &TideQuery, use_mock: bool) -> Result<ObservationSet, TideError> {
    if use_mock {
        let seed = config.fallback.seed.unwrap_or_else(|| mock::seed_for(query));
        return Ok(mock::generate(query, seed, "requested with --mock"));
    }

    let transport = HttpTransport::new(config.query.timeout_secs)?;
    Pipeline::new(transport, config.fallback.policy)
        .with_seed(config.fallback.seed)
        .resolve(query)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = match load_config(&config_path).and_then(|c| apply_overrides(c, &cli)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    let end_date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let query = match TideQuery::new(
        &config.query.station_id,
        end_date,
        config.query.lookback_days,
        config.query.format,
    ) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    println!("🌊 Tide Predictions");
    println!("===================");
    println!(
        "Station {} | {} to {} | {} | {}\n",
        query.station_id,
        query.start_date,
        query.end_date,
        query.datum,
        query.format.as_str()
    );

    let set = match acquire(&config, &query, cli.mock) {
        Ok(set) => set,
        Err(e) if e.is_empty_payload() => {
            warn!(error = %e, "no predictions returned");
            println!("{}", NO_DATA_MESSAGE);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!(error = %e, "could not obtain tide predictions");
            eprintln!("❌ Could not obtain tide predictions: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = ReportOptions {
        display: DisplayMode::from_stride(config.report.stride),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = match write_report(&set, &options, &mut out).and_then(|o| out.flush().map(|_| o)) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ Failed to write report: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.plot.enabled && matches!(outcome, ReportOutcome::Printed(_)) {
        match render_plot(&set, &PlotOptions::from(&config.plot)) {
            Ok(()) => println!("\n📈 Chart written to {}", config.plot.path.display()),
            Err(e) => {
                warn!(error = %e, "chart not written");
                eprintln!("⚠ Chart not written: {}", e);
            }
        }
    }

    ExitCode::SUCCESS
}
