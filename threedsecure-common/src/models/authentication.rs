// File: threedsecure-common/src/models/authentication.rs

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::models::browser::BrowserData;

/// Lifecycle state of a single authentication attempt, as reported by
/// the remote service. States the driver has no action for (including
/// anything behind `Unrecognized`) are passed through without effect.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticationState {
    PendingDirectoryServer,
    PendingChallenge,
    Failed,
    Completed,
    AuthorizedToAttempt,
    /// Transient wire states with no mapped action.
    #[serde(other)]
    Unrecognized,
}

impl AuthenticationState {
    /// Terminal states end the event sequence; no further action or
    /// polling is meaningful past one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AuthenticationState::Failed
                | AuthenticationState::Completed
                | AuthenticationState::AuthorizedToAttempt
        )
    }
}

impl fmt::Display for AuthenticationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationState::PendingDirectoryServer => write!(f, "PENDING_DIRECTORY_SERVER"),
            AuthenticationState::PendingChallenge => write!(f, "PENDING_CHALLENGE"),
            AuthenticationState::Failed => write!(f, "FAILED"),
            AuthenticationState::Completed => write!(f, "COMPLETED"),
            AuthenticationState::AuthorizedToAttempt => write!(f, "AUTHORIZED_TO_ATTEMPT"),
            AuthenticationState::Unrecognized => write!(f, "UNRECOGNIZED"),
        }
    }
}

/// Point-in-time snapshot of an authentication attempt. Fields required
/// by a given state are expected non-null whenever that state is
/// observed; a missing one is a protocol error, not a recoverable
/// condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    pub id: String,
    pub state: AuthenticationState,

    /// 3DS server transaction id, carried into both form payloads.
    #[serde(default)]
    pub transaction_id: Option<String>,

    // Challenge step fields.
    #[serde(default)]
    pub acs_url: Option<String>,
    #[serde(default)]
    pub acs_trans_id: Option<String>,
    #[serde(default)]
    pub acs_protocol_version: Option<String>,

    // DS-method step fields.
    #[serde(default)]
    pub ds_method_url: Option<String>,
    #[serde(default)]
    pub ds_method_callback_url: Option<String>,

    // Terminal-only result fields.
    #[serde(default)]
    pub trans_status: Option<String>,
    #[serde(default)]
    pub trans_status_reason: Option<String>,
    #[serde(default)]
    pub authentication_value: Option<String>,
    #[serde(default)]
    pub eci: Option<String>,
    #[serde(default)]
    pub ds_trans_id: Option<String>,
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub fail_reason: Option<String>,
}

/// Caller-supplied input for one `execute()` run.
#[derive(Debug, Clone)]
pub struct ThreeDSecureParameters {
    /// Authentication id previously created through the main API.
    pub id: String,
    /// Device metadata PATCHed to the service before the flow starts.
    pub browser: BrowserData,
}
