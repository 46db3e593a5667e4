/// Core data types for the tide prediction report.
///
/// This module defines the shared domain model imported by all other modules:
/// observations, station metadata, the query-independent `ObservationSet`,
/// and the `TideError` taxonomy. It contains no I/O.

use chrono::NaiveDateTime;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single predicted water level.
///
/// `timestamp` is in station local time (the CO-OPS `lst_ldt` zone), so it
/// carries no offset. `height_ft` is relative to MLLW.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub height_ft: f64,
}

/// Station metadata, as reported in the `metadata` block of a JSON response.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMetadata {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Where an `ObservationSet` came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOrigin {
    /// Parsed from a CO-OPS API response.
    Live,
    /// Produced by `ingest::mock` because the live fetch could not be used.
    Synthetic { reason: String },
}

/// An ordered series of observations plus optional station metadata.
///
/// Built once by the payload parser or the mock generator and only read
/// afterwards. Every observation has a valid timestamp and a finite height;
/// rows that failed coercion are counted in `skipped_rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    pub metadata: Option<StationMetadata>,
    pub observations: Vec<Observation>,
    pub origin: DataOrigin,
    pub skipped_rows: usize,
}

impl ObservationSet {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.origin, DataOrigin::Synthetic { .. })
    }

    /// Heights in chronological order, for statistics.
    pub fn heights(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.height_ft).collect()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching, parsing, or reporting tide data.
#[derive(Debug, Error)]
pub enum TideError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0} s")]
    Timeout(u64),
    /// DNS, connection, or other transport-level failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Non-2xx HTTP response from the API.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),
    /// The API answered with its own error envelope (bad station, bad range, ...).
    #[error("API error: {0}")]
    Api(String),
    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
    /// Well-formed response with no usable rows.
    #[error("no data: {0}")]
    NoData(String),
    /// A user-supplied date did not match `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    /// Configuration file missing fields or holding invalid values.
    #[error("configuration error: {0}")]
    Config(String),
    /// The chart could not be rendered or written.
    #[error("plot failed: {0}")]
    Plot(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TideError {
    /// Network-level failures: the request never produced a response.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, TideError::Timeout(_) | TideError::Transport(_))
    }

    /// The source answered but there was nothing to report.
    pub fn is_empty_payload(&self) -> bool {
        matches!(self, TideError::NoData(_))
    }
}
