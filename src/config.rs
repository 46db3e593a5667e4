/// Configuration loader - parses tides.toml
///
/// Keeps the station, window, fallback and plot settings out of the code so
/// they can be changed without recompiling. Every field has a default, so a
/// missing file or a partial file both work; command-line flags override
/// whatever is loaded here.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::ingest::query::{ResponseFormat, DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use crate::ingest::transport::DEFAULT_TIMEOUT_SECS;
use crate::model::TideError;
use crate::pipeline::FallbackPolicy;
use crate::stations::{is_valid_station_id, DEFAULT_STATION_ID};

pub const DEFAULT_CONFIG_PATH: &str = "tides.toml";
/// Environment variable (or `.env` entry) naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "TIDEWATCH_CONFIG";
pub const DEFAULT_PLOT_PATH: &str = "tide_plot.png";

/// `[query]`: what to ask the API for.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    pub station_id: String,
    pub lookback_days: u32,
    pub format: ResponseFormat,
    pub timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            station_id: DEFAULT_STATION_ID.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            format: ResponseFormat::Json,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[report]`: how much of each day to print.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// 1 prints every observation; 3 prints every third.
    pub stride: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { stride: 3 }
    }
}

/// `[fallback]`: when synthetic data may replace a failed fetch.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct FallbackConfig {
    pub policy: FallbackPolicy,
    /// Fixed mock seed; derived from the query when absent.
    pub seed: Option<u64>,
}

/// `[plot]`: optional PNG chart.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub markers: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from(DEFAULT_PLOT_PATH),
            markers: true,
            width: 1200,
            height: 600,
        }
    }
}

/// Root configuration structure for TOML parsing.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub query: QueryConfig,
    pub report: ReportConfig,
    pub fallback: FallbackConfig,
    pub plot: PlotConfig,
}

impl AppConfig {
    /// Rejects values that would make the run meaningless.
    pub fn validate(&self) -> Result<(), TideError> {
        if !is_valid_station_id(&self.query.station_id) {
            return Err(TideError::Config(format!(
                "station_id '{}' is not a 7-digit CO-OPS id",
                self.query.station_id
            )));
        }
        if self.query.lookback_days == 0 {
            return Err(TideError::Config("lookback_days must be at least 1".into()));
        }
        if self.query.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(TideError::Config(format!(
                "lookback_days {} exceeds the {}-day limit for hourly predictions",
                self.query.lookback_days, MAX_LOOKBACK_DAYS
            )));
        }
        if self.query.timeout_secs == 0 {
            return Err(TideError::Config("timeout_secs must be at least 1".into()));
        }
        if self.report.stride == 0 {
            return Err(TideError::Config("stride must be at least 1".into()));
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(TideError::Config("plot width and height must be non-zero".into()));
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, TideError> {
    toml::from_str(contents).map_err(|e| TideError::Config(e.to_string()))
}

/// Loads and validates a config file.
///
/// A missing file yields the defaults; an unreadable or malformed one is
/// an error.
pub fn load_config(path: &Path) -> Result<AppConfig, TideError> {
    let config = match fs::read_to_string(path) {
        Ok(contents) => {
            info!(path = %path.display(), "loaded configuration");
            parse_config(&contents)?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no configuration file, using defaults");
            AppConfig::default()
        }
        Err(e) => return Err(TideError::Io(e)),
    };

    config.validate()?;
    Ok(config)
}

/// Resolves the config path: explicit argument, then `TIDEWATCH_CONFIG`
/// (after loading `.env`), then `tides.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    dotenv::dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
