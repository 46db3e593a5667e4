/// Data acquisition from the NOAA CO-OPS datagetter.
///
/// Submodules:
/// - `query`     — request construction and date validation.
/// - `transport` — blocking HTTP GET behind the `Transport` trait.
/// - `coops`     — JSON/CSV response parsing and serialisation.
/// - `mock`      — synthetic series used when live data is unavailable.
/// - `fixtures`  — (test only) representative response payloads.

pub mod coops;
pub mod mock;
pub mod query;
pub mod transport;

#[cfg(test)]
pub(crate) mod fixtures;
