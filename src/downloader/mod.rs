//! Download orchestration, retry policy, and progress events
//!
//! This module drives the complete download workflow:
//!
//! 1. **Validation**: [`crate::StudyParameters::validate`] runs before any
//!    network work
//! 2. **Enumeration**: participant ids come from the study's stats endpoint
//! 3. **Dispatch**: every (participant, data type) task goes through the
//!    single-permit [`rate_limit::ConcurrencyGate`]
//! 4. **Retry**: transient failures are retried once with exponential
//!    backoff via [`retry::RetryPolicy`]
//! 5. **Progress**: typed [`progress::DownloadEvent`]s surface through the
//!    [`progress::EventSink`] callback contract
//! 6. **Archival**: on normal completion the organizer's archive and
//!    organize passes run over the download folder
//!
//! # Error Handling
//!
//! All operations return `Result<T, DownloadError>`. Validation and filter
//! errors never start network work; retryable errors are retried exactly
//! once before being promoted to terminal. Cancellation is not an error and
//! has its own notification path.

pub mod config;
pub mod orchestrator;
pub mod progress;
pub mod rate_limit;
pub mod retry;

pub use orchestrator::DownloadOrchestrator;
pub use progress::{DownloadEvent, EventSink, NoopSink, ProgressReporter, RunState};
pub use rate_limit::{ConcurrencyGate, GateError};
pub use retry::RetryPolicy;

use crate::filter::FilterError;
use crate::organizer::OrganizerError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Pre-flight validation failure; no network call was made
    #[error("{0}")]
    Validation(String),

    /// Terminal HTTP status from the API
    #[error("HTTP error {code}: {description}")]
    HttpStatus {
        /// Status code returned by the server
        code: u16,
        /// Human-readable description keyed by status code
        description: String,
    },

    /// Network-level failure (connect, timeout, read)
    #[error("network error: {0}")]
    Transport(String),

    /// Participant filtering failure
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Concurrency gate failure
    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    /// Archival or organization failure
    #[error("organizer error: {0}")]
    Organizer(#[from] OrganizerError),

    /// Response payload could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// Output file could not be written
    #[error("IO error: {0}")]
    Io(String),
}

impl DownloadError {
    /// User-visible message for terminal failures.
    ///
    /// HTTP 401/403/404 map to specific guidance; all other failures
    /// surface a generic message including the underlying error detail.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::Validation(msg) => msg.clone(),
            DownloadError::HttpStatus { code, description } => format!(
                "An HTTP error occurred while attempting to download the data:\n\n{code} {description}. Please ensure that the study and data type you chose correspond."
            ),
            other => format!("An error occurred while downloading the data: {other}"),
        }
    }
}
