//! The authentication state-machine driver.
//!
//! Consumes the snapshot sequence from the configured event source,
//! dispatches each snapshot to its step handler, applies the
//! inter-step delays, enforces the global timeout through the shared
//! cancellation signal, and maps the last snapshot to the final
//! result. Teardown (timer, frames, running flag) runs on every exit
//! path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::sleep;

use threedsecure_common::Error;
use threedsecure_common::error::CancelReason;
use threedsecure_common::models::{
    Authentication, AuthenticationState, MountPoint, ThreeDSecureParameters, ThreeDSecureResult,
};
use threedsecure_common::traits::FormGateway;

use crate::api::{ApiClient, SourceStrategy};
use crate::cancel::{CancelHandle, CancelToken, sleep_or_cancel};
use crate::handlers::{ChallengeService, DsMethodService};
use crate::http::HttpTransport;
use crate::logging::{EventSink, ExecutionLog};

/// Whole-flow budget; firing cancels with reason `Timeout`.
pub const EXECUTION_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Pause between steps while a challenge is pending.
pub const CHALLENGE_STEP_DELAY: Duration = Duration::from_millis(2250);
/// Pause between steps otherwise.
pub const STEP_DELAY: Duration = Duration::from_millis(5000);

pub struct ThreeDSecureOptions {
    pub base_url: Option<String>,
    pub poll_base_url: Option<String>,
    pub public_key: String,
    pub strategy: SourceStrategy,
    pub transport: Arc<dyn HttpTransport>,
    /// Host capability that mounts and submits the hidden forms.
    pub frames: Arc<dyn FormGateway>,
    /// Container the frames render into; its width picks the
    /// challenge window size.
    pub mount: MountPoint,
    /// Optional host callback receiving step/error events.
    pub events: Option<Arc<dyn EventSink>>,
}

pub struct ThreeDSecureService {
    api: ApiClient,
    strategy: SourceStrategy,
    mount: MountPoint,
    ds_method: DsMethodService,
    challenge: ChallengeService,
    events: Option<Arc<dyn EventSink>>,
    is_running: AtomicBool,
}

impl ThreeDSecureService {
    pub fn new(options: ThreeDSecureOptions) -> Self {
        let api = ApiClient::new(
            options.base_url,
            options.poll_base_url,
            options.public_key,
            options.transport,
        );
        Self {
            api,
            strategy: options.strategy,
            mount: options.mount,
            ds_method: DsMethodService::new(options.frames.clone()),
            challenge: ChallengeService::new(options.frames),
            events: options.events,
            is_running: AtomicBool::new(false),
        }
    }

    /// Runs one authentication to its terminal result.
    ///
    /// Only one execution may be in flight per service instance; a
    /// concurrent second call fails immediately with
    /// `Error::AlreadyRunning` and no side effects. The optional
    /// handle lets the caller cancel from outside.
    pub async fn execute(
        &self,
        parameters: &ThreeDSecureParameters,
        cancel: Option<CancelHandle>,
    ) -> Result<ThreeDSecureResult, Error> {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        let log = ExecutionLog::new(self.events.clone());
        log.trace("ThreeDSecureService: execute");

        let cancel = cancel.unwrap_or_default();
        let token = cancel.token();

        // Global timeout: fires the shared cancellation signal; the
        // source then ends its sequence and the loop exits on its own,
        // letting an in-flight handler finish first.
        let timeout_cancel = cancel.clone();
        let timer = tokio::spawn(async move {
            sleep(EXECUTION_TIMEOUT).await;
            timeout_cancel.cancel(CancelReason::Timeout);
        });

        let outcome = self.run(parameters, &cancel, &token, &log).await;

        if let Err(err) = &outcome {
            log.error(
                "ThreeDSecureService: execution failed",
                &serde_json::json!({ "error": err.to_string() }),
            );
            cancel.cancel(CancelReason::Error);
        }

        // Teardown always runs, success or failure.
        timer.abort();
        self.challenge.clean(&log).await;
        self.ds_method.clean(&log).await;
        self.is_running.store(false, Ordering::SeqCst);
        log.trace("ThreeDSecureService: teardown complete");

        outcome
    }

    async fn run(
        &self,
        parameters: &ThreeDSecureParameters,
        cancel: &CancelHandle,
        token: &CancelToken,
        log: &ExecutionLog,
    ) -> Result<ThreeDSecureResult, Error> {
        self.api.set_browser_data(parameters, log).await?;

        let mut source =
            self.api
                .open_source(self.strategy, &parameters.id, token.clone(), log.clone());

        let mut last: Option<Authentication> = None;
        while let Some(auth) = source.next().await? {
            log.step(
                "ThreeDSecureService: flow step",
                &serde_json::json!({ "id": auth.id, "state": auth.state.to_string() }),
            );

            match auth.state {
                AuthenticationState::PendingDirectoryServer => {
                    self.ds_method.execute(&auth, log).await?;
                }
                AuthenticationState::PendingChallenge => {
                    self.challenge.execute(&auth, &self.mount, log).await?;
                }
                state if state.is_terminal() => {
                    // Exactly once overall; the handle ignores later
                    // writers.
                    cancel.cancel(CancelReason::Completed);
                }
                // States with no mapped action pass through.
                _ => {}
            }

            let pause = if auth.state == AuthenticationState::PendingChallenge {
                CHALLENGE_STEP_DELAY
            } else {
                STEP_DELAY
            };
            last = Some(auth);
            sleep_or_cancel(pause, token).await;
        }

        let Some(auth) = last else {
            return Err(match token.reason() {
                Some(CancelReason::Timeout) => Error::Timeout,
                Some(reason) => Error::Aborted(reason),
                None => Error::Protocol(
                    "event sequence ended before any snapshot was observed".to_string(),
                ),
            });
        };

        if !auth.state.is_terminal() {
            // The sequence ended early; report why instead of handing
            // back stale data as a success.
            return Err(match token.reason() {
                Some(CancelReason::Timeout) => Error::Timeout,
                Some(reason) => Error::Aborted(reason),
                None => Error::Protocol(
                    "event sequence ended before a terminal state".to_string(),
                ),
            });
        }

        log.step(
            "ThreeDSecureService: authentication completed",
            &serde_json::json!({ "id": auth.id, "state": auth.state.to_string() }),
        );
        Ok(ThreeDSecureResult::from(&auth))
    }
}
