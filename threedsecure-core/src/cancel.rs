//! Cooperative cancellation shared by the driver, the event source and
//! the step handlers. Written exactly once per execution: the first
//! reason wins, later attempts are no-ops.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

pub use threedsecure_common::error::CancelReason;

/// Writer half. Cloneable; any clone may raise the signal.
#[derive(Clone)]
pub struct CancelHandle {
    tx: watch::Sender<Option<CancelReason>>,
}

/// Reader half, checked at every suspension point.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<Option<CancelReason>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Raises the signal. Returns `true` only for the first writer.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        })
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        *self.rx.borrow()
    }

    /// Resolves once the signal is raised. If the handle is gone
    /// without ever cancelling, this waits forever; callers pair it
    /// with another branch in `select!`.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if rx.borrow_and_update().is_some() {
                return;
            }
            if rx.changed().await.is_err() {
                futures_util::future::pending::<()>().await;
            }
        }
    }
}

/// Sleeps the full `duration` unless the token fires first. Returns
/// `true` when the wait ended because of cancellation.
pub async fn sleep_or_cancel(duration: Duration, token: &CancelToken) -> bool {
    tokio::select! {
        _ = sleep(duration) => false,
        _ = token.cancelled() => true,
    }
}
