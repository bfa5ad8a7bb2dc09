//! Unit tests for retry classification and backoff

use chronicle_bulk_downloader::downloader::{DownloadError, RetryPolicy};
use std::time::Duration;

fn status(code: u16) -> DownloadError {
    DownloadError::HttpStatus {
        code,
        description: "x".to_string(),
    }
}

/// Default budget: one retry, two attempts total.
#[test]
fn test_default_budget() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_retries(), 1);

    for code in [429, 502, 503, 504] {
        assert!(policy.should_retry(&status(code), 0), "code {code}");
        assert!(!policy.should_retry(&status(code), 1), "code {code}");
    }
}

#[test]
fn test_transport_errors_recreate_and_retry() {
    let policy = RetryPolicy::default();
    let err = DownloadError::Transport("connection closed".to_string());
    assert!(policy.should_retry(&err, 0));
    assert!(!policy.should_retry(&err, 1));
}

#[test]
fn test_client_errors_never_retry() {
    let policy = RetryPolicy::default();
    for code in [400, 401, 403, 404, 418, 500] {
        assert!(!policy.should_retry(&status(code), 0), "code {code}");
    }
}

#[test]
fn test_backoff_is_exponential_over_base() {
    let policy = RetryPolicy::new(3, Duration::from_secs(3));
    assert_eq!(policy.backoff_delay(0), Duration::from_secs(3));
    assert_eq!(policy.backoff_delay(1), Duration::from_secs(6));
    assert_eq!(policy.backoff_delay(2), Duration::from_secs(12));
}

#[test]
fn test_user_messages_for_terminal_statuses() {
    let described = DownloadError::HttpStatus {
        code: 401,
        description: "Unauthorized. Please check the authorization token and try again."
            .to_string(),
    };
    let message = described.user_message();
    assert!(message.contains("401"));
    assert!(message.contains("Unauthorized"));
    assert!(message.contains("study and data type you chose correspond"));

    let generic = DownloadError::Transport("boom".to_string());
    assert!(generic.user_message().contains("boom"));
}
