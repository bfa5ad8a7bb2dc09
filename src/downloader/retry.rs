//! Retry classification and backoff for per-file downloads

use super::config::{calculate_backoff, MAX_RETRIES, RATE_LIMIT_DELAY};
use super::DownloadError;
use reqwest::StatusCode;
use std::time::Duration;

/// HTTP status codes worth a retry: rate limiting and transient upstream
/// failures.
const RETRYABLE_STATUS_CODES: [u16; 4] = [429, 502, 503, 504];

/// Classifies failures as retryable and computes backoff delays.
///
/// The budget is bounded by an explicit attempt counter carried by the
/// caller's loop; there is no recursion and no unbounded retrying.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with a custom retry ceiling and backoff base.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// The configured retry ceiling.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether a status code is worth retrying.
    pub fn is_retryable_status(status: StatusCode) -> bool {
        RETRYABLE_STATUS_CODES.contains(&status.as_u16())
    }

    /// Human-readable description for a terminal HTTP status.
    pub fn status_description(status: StatusCode) -> &'static str {
        match status.as_u16() {
            401 => "Unauthorized. Please check the authorization token and try again.",
            403 => "Forbidden",
            404 => "Not Found",
            _ => "Unknown",
        }
    }

    /// Whether a failed attempt should be retried.
    ///
    /// `attempt` counts completed failed attempts, starting at 0. Retryable:
    /// HTTP 429/502/503/504 and any transport error, while the budget lasts.
    /// All other HTTP statuses propagate immediately.
    pub fn should_retry(&self, error: &DownloadError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        match error {
            DownloadError::HttpStatus { code, .. } => RETRYABLE_STATUS_CODES.contains(code),
            DownloadError::Transport(_) => true,
            _ => false,
        }
    }

    /// Backoff delay before the retry following failed attempt `attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RATE_LIMIT_DELAY)
    }
}
