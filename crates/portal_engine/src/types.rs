use std::fmt;

use serde_json::Value;

/// Issue counter echoed back with every load result.
pub type Generation = u64;
pub type TimerId = u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// 401 or 403.
    Unauthorized(u16),
    NotFound,
    Conflict,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl FailureKind {
    pub fn from_status(code: u16) -> Self {
        match code {
            401 | 403 => FailureKind::Unauthorized(code),
            404 => FailureKind::NotFound,
            409 => FailureKind::Conflict,
            other => FailureKind::HttpStatus(other),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Unauthorized(code) => write!(f, "unauthorized ({code})"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Conflict => write!(f, "conflict"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "invalid json"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Which query a search should run first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Matches,
    /// Filtered search with the given query pairs.
    Filtered(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub payload: Value,
    /// Set when the payload is the public listing because the primary query failed.
    pub fallback_reason: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SearchCompleted {
        generation: Generation,
        result: Result<SearchReport, ApiError>,
    },
    FilterOptionsLoaded {
        generation: Generation,
        result: Result<Value, ApiError>,
    },
    AppliedIdsLoaded {
        generation: Generation,
        result: Result<Value, ApiError>,
    },
    ApplicationsLoaded {
        generation: Generation,
        result: Result<Value, ApiError>,
    },
    ApplyCompleted {
        job_id: String,
        result: Result<Value, ApiError>,
    },
    TimerElapsed {
        timer_id: TimerId,
    },
}
