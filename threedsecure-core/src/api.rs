//! Endpoint construction and the browser-data call against the
//! authentication API, plus the factory for event-source adapters.

use std::sync::Arc;

use threedsecure_common::Error;
use threedsecure_common::models::ThreeDSecureParameters;
use threedsecure_common::traits::AuthenticationSource;

use crate::cancel::CancelToken;
use crate::http::HttpTransport;
use crate::logging::ExecutionLog;
use crate::sources::event_stream::EventStreamSource;
use crate::sources::long_poll::LongPollSource;
use crate::sources::short_poll::ShortPollSource;

pub const DEFAULT_BASE_URL: &str = "https://api.sqala.tech/core/v1/threedsecure";

/// Which transport strategy feeds the driver. All three satisfy the
/// same `AuthenticationSource` contract; the event stream is the
/// deployed default, the pollers are kept as alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceStrategy {
    #[default]
    EventStream,
    ShortPoll,
    LongPoll,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    poll_base_url: String,
    public_key: String,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(
        base_url: Option<String>,
        poll_base_url: Option<String>,
        public_key: String,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let poll_base_url = poll_base_url.unwrap_or_else(|| base_url.clone());
        Self {
            base_url,
            poll_base_url,
            public_key,
            transport,
        }
    }

    fn key_query(&self) -> String {
        format!("publicKey={}", urlencoding::encode(&self.public_key))
    }

    pub fn listen_url(&self, id: &str) -> String {
        format!("{}/{}/listen?{}", self.base_url, id, self.key_query())
    }

    pub fn status_url(&self, id: &str) -> String {
        format!("{}/{}/status?{}", self.base_url, id, self.key_query())
    }

    pub fn poll_url(&self, id: &str) -> String {
        format!("{}/{}?{}", self.poll_base_url, id, self.key_query())
    }

    pub fn browser_url(&self, id: &str) -> String {
        format!("{}/{}/browser?{}", self.base_url, id, self.key_query())
    }

    /// PATCHes the device fingerprint; done once before the event
    /// source is opened. Any non-success status is fatal here.
    pub async fn set_browser_data(
        &self,
        parameters: &ThreeDSecureParameters,
        log: &ExecutionLog,
    ) -> Result<(), Error> {
        let body = serde_json::to_value(&parameters.browser)?;
        log.step("ApiClient: setBrowserData", &body);

        let response = self
            .transport
            .patch_json(self.browser_url(&parameters.id), body)
            .await?;

        if !response.is_success() {
            return Err(Error::Transport(format!(
                "failed to set browser data: HTTP {}",
                response.status
            )));
        }
        Ok(())
    }

    /// Opens a fresh, non-restartable snapshot sequence for one
    /// execution.
    pub fn open_source(
        &self,
        strategy: SourceStrategy,
        id: &str,
        token: CancelToken,
        log: ExecutionLog,
    ) -> Box<dyn AuthenticationSource> {
        match strategy {
            SourceStrategy::EventStream => Box::new(EventStreamSource::new(
                self.transport.clone(),
                self.listen_url(id),
                token,
                log,
            )),
            SourceStrategy::ShortPoll => Box::new(ShortPollSource::new(
                self.transport.clone(),
                self.status_url(id),
                token,
                log,
            )),
            SourceStrategy::LongPoll => Box::new(LongPollSource::new(
                self.transport.clone(),
                self.poll_url(id),
                token,
                log,
            )),
        }
    }
}
