// handlers/challenge.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use threedsecure_common::Error;
use threedsecure_common::models::{Authentication, ChallengeWindowSize, MountPoint};
use threedsecure_common::traits::{FormGateway, FormSubmission, FrameKind};

use crate::logging::ExecutionLog;
use crate::utils::{encode_base64url, require};

/// Signed challenge request posted as the `creq` form field.
#[derive(Debug, Serialize)]
pub struct ChallengeRequest<'a> {
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: &'a str,
    #[serde(rename = "acsTransID")]
    pub acs_trans_id: &'a str,
    #[serde(rename = "messageVersion")]
    pub message_version: &'a str,
    #[serde(rename = "messageType")]
    pub message_type: &'static str,
    #[serde(rename = "challengeWindowSize")]
    pub challenge_window_size: ChallengeWindowSize,
}

/// Drives the interactive challenge step: a visible frame posting the
/// CReq to the issuer's ACS.
pub struct ChallengeService {
    gateway: Arc<dyn FormGateway>,
    submitted: AtomicBool,
}

impl ChallengeService {
    pub fn new(gateway: Arc<dyn FormGateway>) -> Self {
        Self {
            gateway,
            submitted: AtomicBool::new(false),
        }
    }

    pub async fn execute(
        &self,
        authentication: &Authentication,
        mount: &MountPoint,
        log: &ExecutionLog,
    ) -> Result<(), Error> {
        let acs_url = require(authentication.acs_url.as_deref(), "acsUrl")?;
        let acs_trans_id = require(authentication.acs_trans_id.as_deref(), "acsTransId")?;
        let message_version = require(
            authentication.acs_protocol_version.as_deref(),
            "acsProtocolVersion",
        )?;
        let transaction_id = require(authentication.transaction_id.as_deref(), "transactionId")?;

        if self.submitted.swap(true, Ordering::SeqCst) {
            log.trace("ChallengeService: form already submitted, skipping");
            return Ok(());
        }

        let window_size = ChallengeWindowSize::from_width(mount.width);
        let payload = encode_base64url(&ChallengeRequest {
            three_ds_server_trans_id: transaction_id,
            acs_trans_id,
            message_version,
            message_type: "CReq",
            challenge_window_size: window_size,
        })?;

        log.step(
            "ChallengeService: submitting challenge form",
            &serde_json::json!({ "acsUrl": acs_url, "challengeWindowSize": window_size }),
        );

        self.gateway
            .submit(FormSubmission {
                action_url: acs_url.to_string(),
                field_name: "creq".to_string(),
                payload,
                frame: FrameKind::Challenge(window_size),
            })
            .await
    }

    /// Same contract as `DsMethodService::clean`.
    pub async fn clean(&self, log: &ExecutionLog) {
        log.trace("ChallengeService: clean");
        if let Err(err) = self.gateway.clean().await {
            log.soft_error(&format!("ChallengeService: clean failed: {err}"));
        }
        self.submitted.store(false, Ordering::SeqCst);
    }
}
