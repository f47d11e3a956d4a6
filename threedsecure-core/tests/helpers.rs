// tests/helpers.rs
//
// Scripted fakes shared by the integration tests: an HTTP transport
// that replays canned responses, a frame gateway that records
// submissions, and an event sink that records forwarded events.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use threedsecure_core::http::{ByteStream, HttpResponse, HttpTransport};
use threedsecure_core::logging::{EventKind, EventSink};
use threedsecure_core::{
    BrowserData, Error, FormGateway, FormSubmission, MountPoint, SourceStrategy,
    ThreeDSecureOptions, ThreeDSecureParameters, ThreeDSecureService,
};

/// One scripted reply for a plain GET.
#[derive(Debug, Clone)]
pub enum GetReply {
    Status(u16, String),
    /// Simulated transport-level failure (no network).
    Network,
}

impl GetReply {
    pub fn ok(body: impl Into<String>) -> Self {
        GetReply::Status(200, body.into())
    }

    pub fn not_ready() -> Self {
        GetReply::Status(202, String::new())
    }
}

/// Chunks making up one scripted event-stream connection. `Err` fails
/// the stream mid-read.
pub type StreamScript = Vec<Result<String, String>>;

#[derive(Default)]
pub struct FakeTransport {
    get_replies: Mutex<VecDeque<GetReply>>,
    /// Replayed once the scripted GET replies run out.
    repeat_reply: Mutex<Option<GetReply>>,
    stream_scripts: Mutex<VecDeque<StreamScript>>,
    patch_reply: Mutex<Option<Result<u16, String>>>,
    get_count: AtomicU32,
    patch_count: AtomicU32,
    stream_count: AtomicU32,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_gets(&self, replies: Vec<GetReply>) {
        *self.get_replies.lock().unwrap() = replies.into();
    }

    /// Reply to return forever after (or instead of) the scripted
    /// ones.
    pub fn repeat_get(&self, reply: GetReply) {
        *self.repeat_reply.lock().unwrap() = Some(reply);
    }

    pub fn script_stream(&self, chunks: StreamScript) {
        self.stream_scripts.lock().unwrap().push_back(chunks);
    }

    pub fn fail_patch(&self, message: impl Into<String>) {
        *self.patch_reply.lock().unwrap() = Some(Err(message.into()));
    }

    pub fn patch_status(&self, status: u16) {
        *self.patch_reply.lock().unwrap() = Some(Ok(status));
    }

    pub fn get_count(&self) -> u32 {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn patch_count(&self) -> u32 {
        self.patch_count.load(Ordering::SeqCst)
    }

    pub fn stream_count(&self) -> u32 {
        self.stream_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, _url: String) -> Result<HttpResponse, Error> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .get_replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat_reply.lock().unwrap().clone());
        match reply {
            Some(GetReply::Status(status, body)) => Ok(HttpResponse { status, body }),
            Some(GetReply::Network) => {
                Err(Error::Transport("simulated network failure".to_string()))
            }
            None => panic!("FakeTransport: unscripted GET"),
        }
    }

    async fn patch_json(
        &self,
        _url: String,
        _body: serde_json::Value,
    ) -> Result<HttpResponse, Error> {
        self.patch_count.fetch_add(1, Ordering::SeqCst);
        match self.patch_reply.lock().unwrap().clone() {
            None | Some(Ok(200)) => Ok(HttpResponse {
                status: 200,
                body: String::new(),
            }),
            Some(Ok(status)) => Ok(HttpResponse {
                status,
                body: String::new(),
            }),
            Some(Err(message)) => Err(Error::Transport(message)),
        }
    }

    async fn get_stream(&self, _url: String) -> Result<ByteStream, Error> {
        self.stream_count.fetch_add(1, Ordering::SeqCst);
        let script = self
            .stream_scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("FakeTransport: unscripted stream GET");
        let items = script.into_iter().map(|chunk| {
            chunk
                .map(Bytes::from)
                .map_err(Error::Transport)
        });
        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}

/// Frame gateway recording submissions; optionally slow or failing.
#[derive(Default)]
pub struct RecordingGateway {
    submissions: Mutex<Vec<FormSubmission>>,
    completed: AtomicU32,
    cleans: AtomicU32,
    submit_delay: Option<Duration>,
    fail_submit: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_submit: true,
            ..Self::default()
        }
    }

    /// Holds each submission open for `delay` before resolving, like a
    /// frame that takes a while to signal load.
    pub fn slow(delay: Duration) -> Self {
        Self {
            submit_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn completed_count(&self) -> u32 {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn clean_count(&self) -> u32 {
        self.cleans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormGateway for RecordingGateway {
    async fn submit(&self, submission: FormSubmission) -> Result<(), Error> {
        self.submissions.lock().unwrap().push(submission);
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_submit {
            return Err(Error::Frame("frame signalled error".to_string()));
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clean(&self) -> Result<(), Error> {
        self.cleans.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records the step/error events forwarded to the host.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(EventKind, String)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(EventKind, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, kind: EventKind, message: &str, _detail: &serde_json::Value) {
        self.events.lock().unwrap().push((kind, message.to_string()));
    }
}

// ---------------------------------------------------------------------
// Snapshot bodies
// ---------------------------------------------------------------------

pub fn ds_method_snapshot() -> String {
    serde_json::json!({
        "id": "auth-1",
        "state": "PENDING_DIRECTORY_SERVER",
        "transactionId": "tx-1",
        "dsMethodUrl": "https://ds.example/method",
        "dsMethodCallbackUrl": "https://cb.example/notify",
    })
    .to_string()
}

pub fn challenge_snapshot() -> String {
    serde_json::json!({
        "id": "auth-1",
        "state": "PENDING_CHALLENGE",
        "transactionId": "tx-1",
        "acsUrl": "https://acs.example/challenge",
        "acsTransId": "acs-1",
        "acsProtocolVersion": "2.2.0",
    })
    .to_string()
}

pub fn terminal_snapshot(state: &str) -> String {
    serde_json::json!({
        "id": "auth-1",
        "state": state,
        "transactionId": "tx-1",
        "transStatus": "Y",
        "eci": "05",
        "dsTransId": "ds-1",
        "protocolVersion": "2.2.0",
    })
    .to_string()
}

/// Wraps a snapshot body in one event-stream record.
pub fn sse_record(body: &str) -> String {
    format!("data: {body}\n\n")
}

// ---------------------------------------------------------------------
// Service construction
// ---------------------------------------------------------------------

pub fn parameters() -> ThreeDSecureParameters {
    ThreeDSecureParameters {
        id: "auth-1".to_string(),
        browser: BrowserData::new("en-US", "IntegrationTest/1.0", 1280, 720, -120, 24),
    }
}

pub fn service(
    strategy: SourceStrategy,
    transport: Arc<FakeTransport>,
    frames: Arc<RecordingGateway>,
) -> Arc<ThreeDSecureService> {
    Arc::new(ThreeDSecureService::new(ThreeDSecureOptions {
        base_url: None,
        poll_base_url: None,
        public_key: "pk_test".to_string(),
        strategy,
        transport,
        frames,
        mount: MountPoint::new(390),
        events: None,
    }))
}
