//! HTTP transport abstraction for the authentication API.
//!
//! The trait exists so the adapters can be exercised against scripted
//! responses without a network; the default implementation wraps
//! reqwest. Non-success statuses are returned as data from `get` and
//! `patch_json`; the caller decides which codes are soft failures.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::TryStreamExt;

use crate::Error;

/// Status + body of a plain (non-streaming) response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Chunked response body of a streaming GET.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: String) -> Result<HttpResponse, Error>;

    async fn patch_json(&self, url: String, body: serde_json::Value)
        -> Result<HttpResponse, Error>;

    /// Opens a long-lived event-stream connection. Unlike `get`, a
    /// non-success status here is an error: there is no body worth
    /// reading. Dropping the returned stream closes the connection.
    async fn get_stream(&self, url: String) -> Result<ByteStream, Error>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: String) -> Result<HttpResponse, Error> {
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn patch_json(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<HttpResponse, Error> {
        let response = self.client.patch(&url).json(&body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn get_stream(&self, url: String) -> Result<ByteStream, Error> {
        let response = self
            .client
            .get(&url)
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "event stream connection failed: HTTP {status}"
            )));
        }

        Ok(Box::pin(response.bytes_stream().map_err(Error::from)))
    }
}
