//! Per-job lifecycle of an "apply to this job" action.

use std::fmt;

pub const APPLIED_MESSAGE: &str = "Application submitted.";
pub const ALREADY_APPLIED_MESSAGE: &str = "You have already applied to this job.";
pub const JOB_NOT_FOUND_MESSAGE: &str = "This job is no longer available.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const APPLY_FAILED_MESSAGE: &str = "Could not submit your application. Please try again.";

/// Why a backend request did not produce a usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailure {
    /// 401/403: escalated to the login flow, never handled locally.
    Unauthorized,
    NotFound,
    /// 409, e.g. a duplicate application.
    Conflict,
    Timeout,
    Network,
    Server(u16),
    /// The body was not the JSON we asked for.
    Malformed,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Unauthorized => write!(f, "unauthorized"),
            RequestFailure::NotFound => write!(f, "not found"),
            RequestFailure::Conflict => write!(f, "conflict"),
            RequestFailure::Timeout => write!(f, "timeout"),
            RequestFailure::Network => write!(f, "network error"),
            RequestFailure::Server(code) => write!(f, "http status {code}"),
            RequestFailure::Malformed => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApplyState {
    #[default]
    Idle,
    Pending,
    /// Terminal for the job within the session.
    Applied { already_applied: bool },
    /// May be retried, which moves back to `Pending`.
    Failed { message: String },
}

impl ApplyState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ApplyState::Pending)
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyState::Applied { .. })
    }

    /// Whether a click should start a request.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, ApplyState::Idle | ApplyState::Failed { .. })
    }
}

/// What the user sees after an apply request fails.
pub fn apply_failure_message(failure: RequestFailure) -> &'static str {
    match failure {
        RequestFailure::Conflict => ALREADY_APPLIED_MESSAGE,
        RequestFailure::NotFound => JOB_NOT_FOUND_MESSAGE,
        RequestFailure::Unauthorized => SESSION_EXPIRED_MESSAGE,
        RequestFailure::Timeout
        | RequestFailure::Network
        | RequestFailure::Server(_)
        | RequestFailure::Malformed => APPLY_FAILED_MESSAGE,
    }
}
