//! Correlation-bound execution log.
//!
//! One `ExecutionLog` is built per `execute()` call with a fresh v4
//! correlation id and passed explicitly to everything that logs. Step
//! and error events that carry a payload are also forwarded to the
//! host's callback, when one is registered.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

/// Category of a forwarded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Step,
    Error,
}

/// Host callback receiving a filtered subset of execution events.
pub trait EventSink: Send + Sync {
    fn on_event(&self, kind: EventKind, message: &str, detail: &serde_json::Value);
}

#[derive(Clone)]
pub struct ExecutionLog {
    correlation_id: Uuid,
    sink: Option<Arc<dyn EventSink>>,
}

impl ExecutionLog {
    pub fn new(sink: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            sink,
        }
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// A significant step without a payload. Logged, not forwarded.
    pub fn trace(&self, message: &str) {
        info!(correlation_id = %self.correlation_id, "{message}");
    }

    /// A significant step with a payload; forwarded to the sink.
    pub fn step(&self, message: &str, detail: &serde_json::Value) {
        info!(correlation_id = %self.correlation_id, detail = %detail, "{message}");
        if let Some(sink) = &self.sink {
            sink.on_event(EventKind::Step, message, detail);
        }
    }

    /// A recoverable oddity (skipped record, soft-failed poll).
    pub fn soft_error(&self, message: &str) {
        warn!(correlation_id = %self.correlation_id, "{message}");
    }

    /// A fatal error; forwarded to the sink before it propagates.
    pub fn error(&self, message: &str, detail: &serde_json::Value) {
        error!(correlation_id = %self.correlation_id, detail = %detail, "{message}");
        if let Some(sink) = &self.sink {
            sink.on_event(EventKind::Error, message, detail);
        }
    }
}
