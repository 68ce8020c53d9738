use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream unreachable: {0}")]
    Transport(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("Operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Transport failures and timeouts are worth one more attempt; everything else is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Malformed(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
