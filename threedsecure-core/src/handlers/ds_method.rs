// handlers/ds_method.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use threedsecure_common::Error;
use threedsecure_common::models::Authentication;
use threedsecure_common::traits::{FormGateway, FormSubmission, FrameKind};

use crate::logging::ExecutionLog;
use crate::utils::{encode_base64url, require};

/// Payload posted as the `threeDSMethodData` form field.
#[derive(Debug, Serialize)]
pub struct DsMethodData<'a> {
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: &'a str,
    #[serde(rename = "threeDSMethodNotificationURL")]
    pub three_ds_method_notification_url: &'a str,
}

/// Drives the device-fingerprinting step: one hidden form POST to the
/// directory server's method URL.
pub struct DsMethodService {
    gateway: Arc<dyn FormGateway>,
    submitted: AtomicBool,
}

impl DsMethodService {
    pub fn new(gateway: Arc<dyn FormGateway>) -> Self {
        Self {
            gateway,
            submitted: AtomicBool::new(false),
        }
    }

    pub async fn execute(
        &self,
        authentication: &Authentication,
        log: &ExecutionLog,
    ) -> Result<(), Error> {
        let ds_method_url = require(authentication.ds_method_url.as_deref(), "dsMethodUrl")?;
        let callback_url = require(
            authentication.ds_method_callback_url.as_deref(),
            "dsMethodCallbackUrl",
        )?;
        let transaction_id = require(authentication.transaction_id.as_deref(), "transactionId")?;

        // One submission per instance; a repeat call is a no-op.
        if self.submitted.swap(true, Ordering::SeqCst) {
            log.trace("DsMethodService: form already submitted, skipping");
            return Ok(());
        }

        let payload = encode_base64url(&DsMethodData {
            three_ds_server_trans_id: transaction_id,
            three_ds_method_notification_url: callback_url,
        })?;

        log.step(
            "DsMethodService: submitting dsMethod form",
            &serde_json::json!({ "dsMethodUrl": ds_method_url }),
        );

        self.gateway
            .submit(FormSubmission {
                action_url: ds_method_url.to_string(),
                field_name: "threeDSMethodData".to_string(),
                payload,
                frame: FrameKind::DsMethod,
            })
            .await
    }

    /// Releases the gateway's transient resources and re-arms the
    /// submission latch. Idempotent; failures are logged, never
    /// propagated.
    pub async fn clean(&self, log: &ExecutionLog) {
        log.trace("DsMethodService: clean");
        if let Err(err) = self.gateway.clean().await {
            log.soft_error(&format!("DsMethodService: clean failed: {err}"));
        }
        self.submitted.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::challenge::tests::{RecordingGateway, pending_ds_method};

    #[tokio::test]
    async fn submits_encoded_payload_once() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = DsMethodService::new(gateway.clone());
        let log = ExecutionLog::new(None);

        service.execute(&pending_ds_method(), &log).await.unwrap();
        service.execute(&pending_ds_method(), &log).await.unwrap();

        let submissions = gateway.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].field_name, "threeDSMethodData");
        assert_eq!(submissions[0].frame, FrameKind::DsMethod);

        // Payload decodes back to the wire field names.
        use base64::Engine;
        let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(&submissions[0].payload)
            .unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(decoded["threeDSServerTransID"], "tx-1");
        assert_eq!(decoded["threeDSMethodNotificationURL"], "https://cb.example/notify");
    }

    #[tokio::test]
    async fn missing_ds_method_url_is_a_validation_error() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = DsMethodService::new(gateway.clone());

        let mut auth = pending_ds_method();
        auth.ds_method_url = None;
        let err = service
            .execute(&auth, &ExecutionLog::new(None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn clean_is_idempotent_and_rearms_the_latch() {
        let gateway = Arc::new(RecordingGateway::default());
        let service = DsMethodService::new(gateway.clone());
        let log = ExecutionLog::new(None);

        // Safe before execute ever ran.
        service.clean(&log).await;
        service.execute(&pending_ds_method(), &log).await.unwrap();
        service.clean(&log).await;
        service.clean(&log).await;
        assert_eq!(gateway.clean_count(), 3);

        // After clean a fresh submission goes through again.
        service.execute(&pending_ds_method(), &log).await.unwrap();
        assert_eq!(gateway.submissions().len(), 2);
    }
}
