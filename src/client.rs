//! HTTP client lifecycle management
//!
//! The client handle is the only shared mutable resource of a run. It is
//! created lazily on first acquire, recreated after a transport-level
//! failure, and closed unconditionally at the end of the run. All lifecycle
//! transitions happen under one mutex because creation and closure can race
//! with in-flight requests.

use crate::downloader::config::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::downloader::DownloadError;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

/// Owns the shared HTTP client for the duration of one orchestration run.
#[derive(Debug, Default)]
pub struct ClientManager {
    handle: Mutex<Option<Client>>,
}

impl ClientManager {
    /// Create a manager with no client yet; the client is built on first
    /// [`acquire`](Self::acquire).
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the shared client, creating it if none exists or a prior close
    /// dropped it.
    ///
    /// Connection parameters: connect timeout 30 s, request timeout 60 s, a
    /// single keep-alive connection, redirects followed.
    pub async fn acquire(&self) -> Result<Client, DownloadError> {
        let mut handle = self.handle.lock().await;
        if handle.is_none() {
            debug!("Creating new HTTP client");
            let client = Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .pool_max_idle_per_host(1)
                .build()
                .map_err(|e| DownloadError::Transport(format!("failed to build HTTP client: {e}")))?;
            *handle = Some(client);
        }

        // reqwest::Client clones share the same connection pool.
        handle
            .as_ref()
            .cloned()
            .ok_or_else(|| DownloadError::Transport("HTTP client unavailable".to_string()))
    }

    /// Drop the current handle so the next acquire builds a fresh client.
    ///
    /// Called after a transport-level failure to force a new connection.
    pub async fn recreate(&self) {
        let mut handle = self.handle.lock().await;
        if handle.take().is_some() {
            debug!("Dropped HTTP client after transport failure");
        }
    }

    /// Close the client. Idempotent; always invoked at the end of a run,
    /// even on error or cancellation.
    pub async fn close(&self) {
        let mut handle = self.handle.lock().await;
        if handle.take().is_some() {
            debug!("HTTP client closed");
        }
    }
}
