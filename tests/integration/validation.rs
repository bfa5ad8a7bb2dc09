//! Integration tests for pre-flight validation
//!
//! Validation failures must short-circuit before any network work: each
//! test runs against a live mock server and asserts it saw zero requests.

use crate::support::{fast_orchestrator, study_params, RecorderSink};
use chronicle_bulk_downloader::downloader::{DownloadError, DownloadEvent};
use chronicle_bulk_downloader::shutdown::CancelToken;
use chronicle_bulk_downloader::DataType;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_zero_data_types_is_validation_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let params = study_params(dir.path(), Vec::new());
    let mut orchestrator = fast_orchestrator(params, &server.uri());
    let sink = Arc::new(RecorderSink::new());

    let err = orchestrator
        .run(CancelToken::shared(), sink.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Validation(_)));
    assert!(err.to_string().contains("at least one data type"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_short_study_id_is_validation_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut params = study_params(dir.path(), vec![DataType::Raw]);
    params.study_id = "short-id12".to_string();
    let mut orchestrator = fast_orchestrator(params, &server.uri());
    let sink = Arc::new(RecorderSink::new());

    let err = orchestrator
        .run(CancelToken::shared(), sink.clone())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("valid Chronicle study ID"));
    assert!(server.received_requests().await.unwrap().is_empty());

    // The failure surfaces through the error callback, nothing else.
    let events = sink.events();
    assert!(events.iter().any(|e| matches!(
        e,
        DownloadEvent::Error { message } if message.contains("valid Chronicle study ID")
    )));
    assert!(!events.contains(&DownloadEvent::Completed));
    assert!(!events.contains(&DownloadEvent::Cancelled));
}

#[tokio::test]
async fn test_empty_download_folder_is_validation_error() {
    let server = MockServer::start().await;

    let mut params = study_params(std::path::Path::new("placeholder"), vec![DataType::Raw]);
    params.download_folder = std::path::PathBuf::new();
    let mut orchestrator = fast_orchestrator(params, &server.uri());

    let err = orchestrator
        .run(CancelToken::shared(), Arc::new(RecorderSink::new()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("download folder"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inclusive_mode_requires_filter_list() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut params = study_params(dir.path(), vec![DataType::Raw]);
    params.filter_mode = chronicle_bulk_downloader::FilterMode::Inclusive;
    params.filter_list = vec!["  ".to_string()];
    let mut orchestrator = fast_orchestrator(params, &server.uri());

    let err = orchestrator
        .run(CancelToken::shared(), Arc::new(RecorderSink::new()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("*include*"));
    assert!(server.received_requests().await.unwrap().is_empty());
}
