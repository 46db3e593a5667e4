/// Analysis over a parsed observation series.
///
/// Submodules:
/// - `groupings` — splits a series into calendar-day groups.
/// - `summary`   — min / max / mean / standard deviation.

pub mod groupings;
pub mod summary;
