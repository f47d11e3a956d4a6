// sources/long_poll.rs
//
// Resilient long-poll strategy: one GET per pull. HTTP 202 means "not
// ready yet" and is retried on a short interval up to a bounded number
// of attempts; any other non-success status is a hard failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use threedsecure_common::Error;
use threedsecure_common::models::Authentication;
use threedsecure_common::traits::AuthenticationSource;

use crate::cancel::{CancelToken, sleep_or_cancel};
use crate::http::HttpTransport;
use crate::logging::ExecutionLog;

pub const RETRY_INTERVAL: Duration = Duration::from_millis(800);
pub const MAX_ATTEMPTS: u32 = 10;

pub struct LongPollSource {
    transport: Arc<dyn HttpTransport>,
    url: String,
    token: CancelToken,
    log: ExecutionLog,
    stopped: bool,
}

impl LongPollSource {
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
            stopped: false,
        }
    }
}

#[async_trait]
impl AuthenticationSource for LongPollSource {
    async fn next(&mut self) -> Result<Option<Authentication>, Error> {
        if self.stopped || self.token.is_cancelled() {
            return Ok(None);
        }

        // The retry budget is per pull; the driver re-invokes us for
        // each subsequent snapshot.
        for attempt in 1..=MAX_ATTEMPTS {
            if self.token.is_cancelled() {
                return Ok(None);
            }

            let response = self.transport.get(self.url.clone()).await?;

            if response.status == 202 {
                self.log.trace(&format!(
                    "LongPollSource: not ready (attempt {attempt}/{MAX_ATTEMPTS})"
                ));
                if attempt < MAX_ATTEMPTS
                    && sleep_or_cancel(RETRY_INTERVAL, &self.token).await
                {
                    return Ok(None);
                }
                continue;
            }

            if !response.is_success() {
                return Err(Error::Transport(format!(
                    "long poll failed: HTTP {}",
                    response.status
                )));
            }

            let auth: Authentication = serde_json::from_str(&response.body)?;
            if auth.state.is_terminal() {
                self.log.trace("LongPollSource: terminal state received, stopping");
                self.stopped = true;
            }
            return Ok(Some(auth));
        }

        self.log
            .soft_error("LongPollSource: retry budget exhausted, ending sequence");
        self.stopped = true;
        Ok(None)
    }
}
