/// NOAA CO-OPS data getter: request construction.
///
/// Builds the GET URL for tide predictions:
///   https://api.tidesandcurrents.noaa.gov/api/prod/datagetter
///
/// Everything except the station, the date window and the response format
/// is fixed: hourly MLLW predictions in feet, in station local time.

use chrono::{Days, NaiveDate};

use crate::model::TideError;

const DATAGETTER_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";
const APPLICATION_NAME: &str = "tidewatch";

/// CO-OPS date format for `begin_date` / `end_date`.
const API_DATE_FORMAT: &str = "%Y%m%d";

pub const PRODUCT_PREDICTIONS: &str = "predictions";
pub const DATUM_MLLW: &str = "MLLW";
/// Local standard time or local daylight time, whichever is in effect.
pub const TIME_ZONE_LST_LDT: &str = "lst_ldt";
/// Feet.
pub const UNITS_ENGLISH: &str = "english";
pub const INTERVAL_HOURLY: &str = "h";

pub const DEFAULT_LOOKBACK_DAYS: u32 = 3;
/// CO-OPS serves at most one year of hourly predictions per request.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

// ---------------------------------------------------------------------------
// Response format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "csv" => Ok(ResponseFormat::Csv),
            other => Err(format!("unknown format '{}', expected json or csv", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A fully-specified tide prediction request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TideQuery {
    pub station_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub product: &'static str,
    pub datum: &'static str,
    pub units: &'static str,
    pub time_zone: &'static str,
    pub interval: &'static str,
    pub format: ResponseFormat,
}

impl TideQuery {
    /// Builds a query ending at `end_date` and reaching back `lookback_days`.
    ///
    /// # Errors
    /// `TideError::InvalidDate` when `lookback_days` exceeds
    /// `MAX_LOOKBACK_DAYS` or the start date falls outside the calendar.
    pub fn new(
        station_id: &str,
        end_date: NaiveDate,
        lookback_days: u32,
        format: ResponseFormat,
    ) -> Result<Self, TideError> {
        if lookback_days > MAX_LOOKBACK_DAYS {
            return Err(TideError::InvalidDate(format!(
                "lookback of {} days exceeds the {}-day limit",
                lookback_days, MAX_LOOKBACK_DAYS
            )));
        }
        let start_date = end_date
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .ok_or_else(|| TideError::InvalidDate(format!("{} minus {} days", end_date, lookback_days)))?;

        Ok(Self {
            station_id: station_id.to_string(),
            start_date,
            end_date,
            product: PRODUCT_PREDICTIONS,
            datum: DATUM_MLLW,
            units: UNITS_ENGLISH,
            time_zone: TIME_ZONE_LST_LDT,
            interval: INTERVAL_HOURLY,
            format,
        })
    }

    /// Number of whole days between start and end.
    pub fn window_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Renders the request URL.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use tidewatch::ingest::query::{ResponseFormat, TideQuery};
    ///
    /// let end = NaiveDate::from_ymd_opt(2024, 9, 10).unwrap();
    /// let query = TideQuery::new("8665530", end, 3, ResponseFormat::Json).unwrap();
    /// assert!(query.url().contains("begin_date=20240907"));
    /// ```
    pub fn url(&self) -> String {
        format!(
            "{}?begin_date={}&end_date={}&station={}&product={}&datum={}&time_zone={}&units={}&interval={}&format={}&application={}",
            DATAGETTER_BASE_URL,
            self.start_date.format(API_DATE_FORMAT),
            self.end_date.format(API_DATE_FORMAT),
            urlencoding::encode(&self.station_id),
            self.product,
            self.datum,
            self.time_zone,
            self.units,
            self.interval,
            self.format.as_str(),
            APPLICATION_NAME,
        )
    }
}

/// Recovers `(begin_date, end_date)` from a datagetter URL.
///
/// Returns `None` when either parameter is missing or not a `YYYYMMDD` date.
pub fn date_range_from_url(url: &str) -> Option<(NaiveDate, NaiveDate)> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let mut begin = None;
    let mut end = None;

    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "begin_date" => begin = NaiveDate::parse_from_str(&value, API_DATE_FORMAT).ok(),
            "end_date" => end = NaiveDate::parse_from_str(&value, API_DATE_FORMAT).ok(),
            _ => {}
        }
    }

    Some((begin?, end?))
}

/// Validates a user-supplied target date.
///
/// The input must be exactly `YYYY-MM-DD` (ten characters, digits and
/// dashes in place) and name a real calendar day.
pub fn parse_target_date(input: &str) -> Result<NaiveDate, TideError> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();

    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !shape_ok {
        return Err(TideError::InvalidDate(trimmed.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| TideError::InvalidDate(trimmed.to_string()))
}
