//! Download configuration constants

use std::time::Duration;

/// Maximum number of retries for a failed download request.
/// One retry means two attempts total: the initial request plus one
/// re-request after backoff.
pub const MAX_RETRIES: u32 = 1;

/// Mandatory pause after every successful download, and the base delay for
/// retry backoff. The remote API rate-limits aggressively; every request of
/// a run is spaced by at least this much.
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(3);

/// Time allowed to establish a TCP connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Overall time allowed for one request, including the response body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How long the caller waits for the worker to acknowledge a cancellation
/// request before forcing its own surface back to idle. A UI-liveness bound
/// only; the worker may still be finishing an in-flight request.
pub const CANCEL_FAILSAFE_TIMEOUT: Duration = Duration::from_secs(3);

/// Calculate exponential backoff delay for a retry.
///
/// `attempt` counts completed failed attempts, starting at 0, so the first
/// retry waits `base_delay` and each further retry doubles it.
pub fn calculate_backoff(attempt: u32, base_delay: Duration) -> Duration {
    base_delay.saturating_mul(2u32.saturating_pow(attempt))
}
