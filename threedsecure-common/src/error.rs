// threedsecure-common/src/error.rs

use thiserror::Error;

/// Why an execution's cancellation signal was raised. The first reason
/// written wins; later cancellation attempts are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// A terminal authentication state was observed.
    Completed,
    /// The global execution timeout elapsed.
    Timeout,
    /// A fatal error unwound the execution.
    Error,
    /// The caller cancelled through the handle it supplied.
    External,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Completed => write!(f, "completed"),
            CancelReason::Timeout => write!(f, "timeout"),
            CancelReason::Error => write!(f, "error"),
            CancelReason::External => write!(f, "external"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Frame error: {0}")]
    Frame(String),

    #[error("ThreeDSecureService is already running")]
    AlreadyRunning,

    #[error("Authentication timed out before reaching a terminal state")]
    Timeout,

    #[error("Authentication aborted before reaching a terminal state: {0}")]
    Aborted(CancelReason),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Protocol(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Protocol(s.to_string())
    }
}
