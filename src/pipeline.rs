/// Fetch pipeline: query → transport → parser, with synthetic fallback.
///
/// `Pipeline::fetch` reports exactly what happened (data, empty result, or
/// failure). `Pipeline::resolve` then applies the configured
/// `FallbackPolicy` to decide whether a failure is reported to the user or
/// replaced by mock data.

use serde::Deserialize;
use tracing::{info, warn};

use crate::ingest::coops::parse_payload;
use crate::ingest::mock;
use crate::ingest::query::TideQuery;
use crate::ingest::transport::Transport;
use crate::model::{ObservationSet, TideError};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// When synthetic data may stand in for a live fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Report every failure; never substitute mock data.
    Never,
    /// Substitute mock data only when the request never got a response
    /// (timeout, DNS, connection refused). API errors such as an unknown
    /// station are reported so they are not mistaken for network trouble.
    #[default]
    Transport,
    /// Substitute mock data for any failure, including empty payloads.
    Any,
}

impl FallbackPolicy {
    pub fn allows(&self, outcome: &FetchOutcome) -> bool {
        match (self, outcome) {
            (_, FetchOutcome::Data(_)) => false,
            (FallbackPolicy::Never, _) => false,
            (FallbackPolicy::Any, _) => true,
            (FallbackPolicy::Transport, FetchOutcome::Failed(e)) => e.is_transport_failure(),
            (FallbackPolicy::Transport, FetchOutcome::Empty(_)) => false,
        }
    }
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "never" => Ok(FallbackPolicy::Never),
            "transport" => Ok(FallbackPolicy::Transport),
            "any" => Ok(FallbackPolicy::Any),
            other => Err(format!("unknown fallback policy '{}', expected never, transport or any", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one live fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Data(ObservationSet),
    /// The source answered but had no usable rows.
    Empty(String),
    Failed(TideError),
}

impl FetchOutcome {
    fn describe(&self) -> String {
        match self {
            FetchOutcome::Data(set) => format!("{} observations", set.len()),
            FetchOutcome::Empty(reason) => format!("empty response: {}", reason),
            FetchOutcome::Failed(e) => e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline<T: Transport> {
    transport: T,
    policy: FallbackPolicy,
    seed: Option<u64>,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(transport: T, policy: FallbackPolicy) -> Self {
        Self {
            transport,
            policy,
            seed: None,
        }
    }

    /// Fixes the mock generator seed instead of deriving it from the query.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// One GET plus parse; never panics, never falls back.
    pub fn fetch(&self, query: &TideQuery) -> FetchOutcome {
        let url = query.url();
        info!(station = %query.station_id, start = %query.start_date, end = %query.end_date, "fetching tide predictions");

        let response = match self.transport.get(&url) {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failed(e),
        };

        if !response.is_success() {
            return FetchOutcome::Failed(TideError::HttpStatus(response.status));
        }

        match parse_payload(&response.body, query.format) {
            Ok(set) => FetchOutcome::Data(set),
            Err(TideError::NoData(reason)) => FetchOutcome::Empty(reason),
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Fetches, then applies the fallback policy.
    ///
    /// # Errors
    /// The fetch error when the policy does not allow a fallback;
    /// `TideError::NoData` for an empty response under the same condition.
    pub fn resolve(&self, query: &TideQuery) -> Result<ObservationSet, TideError> {
        let outcome = self.fetch(query);

        if self.policy.allows(&outcome) {
            let reason = outcome.describe();
            warn!(policy = ?self.policy, %reason, "live fetch unusable, falling back to synthetic data");
            let seed = self.seed.unwrap_or_else(|| mock::seed_for(query));
            return Ok(mock::generate(query, seed, &reason));
        }

        match outcome {
            FetchOutcome::Data(set) => {
                info!(observations = set.len(), skipped = set.skipped_rows, "parsed live predictions");
                Ok(set)
            }
            FetchOutcome::Empty(reason) => Err(TideError::NoData(reason)),
            FetchOutcome::Failed(e) => Err(e),
        }
    }
}
