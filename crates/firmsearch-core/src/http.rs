//! Shared HTTP plumbing for the backend clients.

use std::time::Duration;

use crate::error::{Error, Result};

/// Build a pooled client with a hard per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| Error::InvalidConfig(format!("Failed to create HTTP client: {e}")))
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else if let Some(status) = e.status() {
            Error::UpstreamStatus(status.as_u16())
        } else if e.is_decode() || e.is_body() {
            Error::Malformed(e.to_string())
        } else {
            Error::Transport(e.to_string())
        }
    }
}
