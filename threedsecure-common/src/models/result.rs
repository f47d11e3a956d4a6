// File: threedsecure-common/src/models/result.rs

use serde::Serialize;

use crate::models::authentication::{Authentication, AuthenticationState};

/// Final outcome of an execution, derived once from the last snapshot
/// the driver observed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSecureResult {
    pub id: String,
    #[serde(skip)]
    pub state: AuthenticationState,
    pub trans_status: Option<String>,
    pub trans_status_reason: Option<String>,
    pub authentication_value: Option<String>,
    pub eci: Option<String>,
    pub ds_trans_id: Option<String>,
    pub protocol_version: Option<String>,
    pub fail_reason: Option<String>,
}

impl ThreeDSecureResult {
    pub fn is_success(&self) -> bool {
        matches!(
            self.state,
            AuthenticationState::Completed | AuthenticationState::AuthorizedToAttempt
        )
    }
}

impl From<&Authentication> for ThreeDSecureResult {
    fn from(auth: &Authentication) -> Self {
        Self {
            id: auth.id.clone(),
            state: auth.state,
            trans_status: auth.trans_status.clone(),
            trans_status_reason: auth.trans_status_reason.clone(),
            authentication_value: auth.authentication_value.clone(),
            eci: auth.eci.clone(),
            ds_trans_id: auth.ds_trans_id.clone(),
            protocol_version: auth.protocol_version.clone(),
            fail_reason: auth.fail_reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(state: AuthenticationState) -> Authentication {
        serde_json::from_value(serde_json::json!({
            "id": "auth-1",
            "state": serde_json::to_value(state).unwrap(),
            "transStatus": "Y",
            "eci": "05",
        }))
        .unwrap()
    }

    #[test]
    fn completed_and_attempt_are_success() {
        assert!(ThreeDSecureResult::from(&auth(AuthenticationState::Completed)).is_success());
        assert!(
            ThreeDSecureResult::from(&auth(AuthenticationState::AuthorizedToAttempt)).is_success()
        );
        assert!(!ThreeDSecureResult::from(&auth(AuthenticationState::Failed)).is_success());
    }

    #[test]
    fn echoes_terminal_fields() {
        let result = ThreeDSecureResult::from(&auth(AuthenticationState::Completed));
        assert_eq!(result.id, "auth-1");
        assert_eq!(result.trans_status.as_deref(), Some("Y"));
        assert_eq!(result.eci.as_deref(), Some("05"));
        assert!(result.fail_reason.is_none());
    }
}
