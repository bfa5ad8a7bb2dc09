//! Request serialization and inter-request pacing
//!
//! A single-permit semaphore wraps every outbound request so no two HTTP
//! requests are ever concurrent, regardless of how many tasks are pending.
//! After each successful download the gate additionally sleeps for the
//! mandatory rate-limit pause.

use super::config::RATE_LIMIT_DELAY;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::sleep;

/// Concurrency gate errors
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Failed to acquire the request permit
    #[error("failed to acquire request permit: {0}")]
    AcquireError(String),
}

/// Single-permit gate serializing all outbound requests.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    permit: Arc<Semaphore>,
    pause: Duration,
}

impl ConcurrencyGate {
    /// Create a gate with the production pause of 3 seconds.
    pub fn new() -> Self {
        Self::with_pause(RATE_LIMIT_DELAY)
    }

    /// Create a gate with a custom post-success pause.
    pub fn with_pause(pause: Duration) -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
            pause,
        }
    }

    /// Acquire the single request permit.
    ///
    /// The permit is held for the duration of the request and released when
    /// the returned guard drops.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, GateError> {
        self.permit
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| GateError::AcquireError(e.to_string()))
    }

    /// Sleep for the mandatory pause applied after every successful
    /// download, independent of retry backoff.
    pub async fn pause_after_success(&self) {
        sleep(self.pause).await;
    }

    /// The configured post-success pause.
    pub fn pause(&self) -> Duration {
        self.pause
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new()
    }
}
