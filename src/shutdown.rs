//! Cooperative cancellation token.
//!
//! Provides a lightweight [`CancelToken`] that the caller sets and the
//! orchestration worker polls between requests. There is no mid-request
//! abort: an in-flight HTTP request always completes or fails on its own
//! before the token is honored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared handle to a cancellation token.
pub type SharedCancel = Arc<CancelToken>;

/// Thread-safe cooperative cancellation flag.
#[derive(Debug, Default)]
pub struct CancelToken {
    is_cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a new token.
    pub fn new() -> Self {
        Self {
            is_cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Create a new shared token wrapped in [`Arc`].
    pub fn shared() -> SharedCancel {
        Arc::new(Self::new())
    }

    /// Request cancellation. Notifies all registered waiters exactly once.
    pub fn request_cancel(&self) {
        if !self.is_cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled.load(Ordering::SeqCst)
    }

    /// Wait until cancellation is requested. Returns immediately if already set.
    pub async fn wait_cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}
