// sources/short_poll.rs
//
// Short-poll strategy: GET the status endpoint on a fixed interval and
// emit only on state change. A non-success status is logged and the
// poll skipped; a transport-level failure stops polling and ends the
// sequence.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use threedsecure_common::Error;
use threedsecure_common::models::{Authentication, AuthenticationState};
use threedsecure_common::traits::AuthenticationSource;

use crate::cancel::{CancelToken, sleep_or_cancel};
use crate::http::HttpTransport;
use crate::logging::ExecutionLog;

pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

pub struct ShortPollSource {
    transport: Arc<dyn HttpTransport>,
    url: String,
    token: CancelToken,
    log: ExecutionLog,
    last_state: Option<AuthenticationState>,
    stopped: bool,
}

impl ShortPollSource {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        url: String,
        token: CancelToken,
        log: ExecutionLog,
    ) -> Self {
        Self {
            transport,
            url,
            token,
            log,
            last_state: None,
            stopped: false,
        }
    }
}

#[async_trait]
impl AuthenticationSource for ShortPollSource {
    async fn next(&mut self) -> Result<Option<Authentication>, Error> {
        // Set when an iteration already served the interval, so the
        // next one does not sleep a second time.
        let mut interval_served = false;
        loop {
            if self.stopped || self.token.is_cancelled() {
                return Ok(None);
            }

            // First observation polls immediately; afterwards the
            // fixed interval applies between requests.
            if self.last_state.is_some()
                && !interval_served
                && sleep_or_cancel(POLL_INTERVAL, &self.token).await
            {
                return Ok(None);
            }
            interval_served = false;

            let response = match self.transport.get(self.url.clone()).await {
                Ok(response) => response,
                Err(err) => {
                    // No network: stop scheduling polls, end the
                    // sequence. The driver surfaces the incomplete
                    // execution.
                    self.log
                        .soft_error(&format!("ShortPollSource: transport failure, stopping: {err}"));
                    self.stopped = true;
                    return Ok(None);
                }
            };

            if !response.is_success() {
                self.log.soft_error(&format!(
                    "ShortPollSource: poll failed with HTTP {}, skipping",
                    response.status
                ));
                // Force the interval before the retry even if nothing
                // was emitted yet.
                if sleep_or_cancel(POLL_INTERVAL, &self.token).await {
                    return Ok(None);
                }
                interval_served = true;
                continue;
            }

            // A single poll response decodes to exactly one snapshot;
            // there is no next record to skip to, so a decode failure
            // is fatal.
            let auth: Authentication = serde_json::from_str(&response.body)?;

            if self.last_state == Some(auth.state) {
                continue;
            }
            self.last_state = Some(auth.state);

            if auth.state.is_terminal() {
                self.log.trace("ShortPollSource: terminal state received, stopping polls");
                self.stopped = true;
            }
            return Ok(Some(auth));
        }
    }
}
