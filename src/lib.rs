/// tidewatch: NOAA tide prediction report.
///
/// # Module structure
///
/// ```text
/// tidewatch
/// ├── model       — shared data types (Observation, ObservationSet, TideError, …)
/// ├── config      — tides.toml loader and validation
/// ├── stations    — known CO-OPS stations and station id validation
/// ├── logging     — tracing subscriber setup
/// ├── ingest
/// │   ├── query     — datagetter URL construction, target date parsing
/// │   ├── transport — blocking HTTP GET with timeout
/// │   ├── coops     — JSON + CSV parsing, wire serialisation
/// │   ├── mock      — synthetic fallback series
/// │   └── fixtures (test only) — representative API response payloads
/// ├── pipeline    — fetch → parse with fallback policy
/// ├── analysis
/// │   ├── groupings — per-calendar-day grouping
/// │   └── summary   — descriptive statistics
/// ├── report      — text tables and summary block
/// ├── plot        — PNG tide chart
/// └── survey      — bird survey CSV summary
/// ```

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod stations;
pub mod survey;
