// sources/event_stream.rs
//
// Streaming strategy: one long-lived event-stream GET, parsed record
// by record. A malformed record is logged and skipped; the sequence
// continues with the next one.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;

use threedsecure_common::Error;
use threedsecure_common::models::Authentication;
use threedsecure_common::traits::AuthenticationSource;

use crate::cancel::CancelToken;
use crate::http::{ByteStream, HttpTransport};
use crate::logging::ExecutionLog;

/// Incremental parser for the delimited event payload: records are
/// separated by a blank line, the meaningful lines of a record carry a
/// `data:` prefix, and multiple data lines in one record are joined
/// with newlines before JSON-decoding. Partial records are buffered
/// across network reads.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    /// Raw bytes: a multi-byte character may arrive split across
    /// reads, so decoding waits until a record is complete.
    buffer: Vec<u8>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network chunk; returns every record payload completed
    /// by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(split) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let record = String::from_utf8_lossy(&self.buffer[..split]).into_owned();
            self.buffer.drain(..split + 2);

            let mut data = String::new();
            for line in record.lines() {
                if let Some(rest) = line.strip_prefix("data:") {
                    data.push_str(rest.trim());
                    data.push('\n');
                }
            }
            let data = data.trim().to_string();
            if !data.is_empty() {
                payloads.push(data);
            }
        }
        payloads
    }
}

/// Outcome of awaiting one network read.
enum StreamRead {
    Cancelled,
    Records(Vec<String>),
    Failed(Error),
    Closed,
}

pub struct EventStreamSource {
    transport: Arc<dyn HttpTransport>,
    url: String,
    token: CancelToken,
    log: ExecutionLog,
    /// Open connection plus its parser; dropped on every exit path.
    connection: Option<(ByteStream, EventStreamParser)>,
    /// Snapshots decoded beyond the first from one chunk.
    pending: VecDeque<Authentication>,
    terminated: bool,
}

impl EventStreamSource {
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
            connection: None,
            pending: VecDeque::new(),
            terminated: false,
        }
    }

    fn close(&mut self) {
        // Dropping the stream closes the underlying connection.
        self.connection = None;
    }

    /// Decodes the completed payloads of one chunk into the pending
    /// queue, stopping at a terminal snapshot.
    fn enqueue_payloads(&mut self, payloads: Vec<String>) {
        for payload in payloads {
            if self.terminated {
                break;
            }
            match serde_json::from_str::<Authentication>(&payload) {
                Ok(auth) => {
                    if auth.state.is_terminal() {
                        self.log.trace("EventStreamSource: terminal state received, closing after this record");
                        self.terminated = true;
                    }
                    self.pending.push_back(auth);
                }
                Err(err) => {
                    // Stream noise tolerance: skip the record, keep the
                    // sequence alive.
                    self.log
                        .soft_error(&format!("EventStreamSource: skipping malformed record: {err}"));
                }
            }
        }
    }
}

#[async_trait]
impl AuthenticationSource for EventStreamSource {
    async fn next(&mut self) -> Result<Option<Authentication>, Error> {
        loop {
            // Checked before the queue is drained: a snapshot buffered
            // from an earlier chunk must not leak out after
            // cancellation.
            if self.token.is_cancelled() {
                self.pending.clear();
                self.close();
                return Ok(None);
            }

            if let Some(auth) = self.pending.pop_front() {
                if self.terminated && self.pending.is_empty() {
                    self.close();
                }
                return Ok(Some(auth));
            }

            if self.terminated {
                self.close();
                return Ok(None);
            }

            if self.connection.is_none() {
                let stream = self.transport.get_stream(self.url.clone()).await?;
                self.log.trace("EventStreamSource: connection established");
                self.connection = Some((stream, EventStreamParser::new()));
            }

            let read = {
                let token = self.token.clone();
                let (stream, parser) = self
                    .connection
                    .as_mut()
                    .ok_or_else(|| Error::Protocol("event stream connection missing".to_string()))?;
                tokio::select! {
                    _ = token.cancelled() => StreamRead::Cancelled,
                    chunk = stream.next() => match chunk {
                        Some(Ok(bytes)) => StreamRead::Records(parser.push(&bytes)),
                        Some(Err(err)) => StreamRead::Failed(err),
                        None => StreamRead::Closed,
                    },
                }
            };

            match read {
                StreamRead::Cancelled => {
                    self.log.trace("EventStreamSource: cancellation observed, closing connection");
                    self.close();
                    return Ok(None);
                }
                StreamRead::Records(payloads) => self.enqueue_payloads(payloads),
                StreamRead::Failed(err) => {
                    self.close();
                    return Err(err);
                }
                StreamRead::Closed => {
                    self.log.trace("EventStreamSource: stream ended");
                    self.terminated = true;
                    self.close();
                    return Ok(None);
                }
            }
        }
    }
}
