//! Explicit result of a call to an optional collaborator.
//!
//! Backends that the search pipeline can live without report back through
//! [`Outcome`] instead of an error, so callers decide how to degrade.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Why a collaborator could not deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    Timeout,
    Unreachable(String),
    UpstreamStatus(u16),
    Malformed(String),
    NoEmbedding,
    Unconfigured,
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::Timeout => write!(f, "timed out"),
            DegradeReason::Unreachable(msg) => write!(f, "unreachable: {msg}"),
            DegradeReason::UpstreamStatus(code) => write!(f, "upstream status {code}"),
            DegradeReason::Malformed(msg) => write!(f, "malformed response: {msg}"),
            DegradeReason::NoEmbedding => write!(f, "no embedding produced"),
            DegradeReason::Unconfigured => write!(f, "not configured"),
        }
    }
}

impl From<&Error> for DegradeReason {
    fn from(e: &Error) -> Self {
        match e {
            Error::Timeout(_) => DegradeReason::Timeout,
            Error::Transport(msg) => DegradeReason::Unreachable(msg.clone()),
            Error::UpstreamStatus(code) => DegradeReason::UpstreamStatus(*code),
            Error::Malformed(msg) => DegradeReason::Malformed(msg.clone()),
            Error::InvalidConfig(_) => DegradeReason::Unconfigured,
            Error::InvalidRequest(msg) | Error::Internal(msg) => {
                DegradeReason::Unreachable(msg.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Degraded(DegradeReason),
    /// The collaborator answered but had nothing to offer.
    Empty,
}

impl<T> Outcome<T> {
    pub fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Degraded(DegradeReason::from(&e)),
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The reason a caller should report when this outcome is not a success.
    pub fn shortfall(&self) -> Option<DegradeReason> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Degraded(reason) => Some(reason.clone()),
            Outcome::Empty => Some(DegradeReason::NoEmbedding),
        }
    }
}
