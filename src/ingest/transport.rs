/// Blocking HTTP transport for the CO-OPS API.
///
/// The `Transport` trait is the seam between the pipeline and the network:
/// `HttpTransport` issues real requests, tests substitute canned responses
/// or failures.

use std::time::Duration;

use tracing::debug;

use crate::model::TideError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET and reports what came back.
///
/// Implementations return `Ok` for any completed exchange, whatever the
/// status code, and reserve `Err` for requests that produced no response.
pub trait Transport {
    fn get(&self, url: &str) -> Result<RawResponse, TideError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Result<Self, TideError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TideError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout_secs })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn classify(&self, err: reqwest::Error) -> TideError {
        if err.is_timeout() {
            TideError::Timeout(self.timeout_secs)
        } else {
            TideError::Transport(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<RawResponse, TideError> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json, text/csv")
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| self.classify(e))?;

        debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}
