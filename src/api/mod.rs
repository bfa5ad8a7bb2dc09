//! Chronicle API access
//!
//! Wraps all HTTP traffic of a run: the participant-stats enumeration call
//! and the per-file CSV downloads. Every request goes through the
//! single-permit [`ConcurrencyGate`] and carries the run's bearer token.
//! Per-file downloads retry transient failures through [`RetryPolicy`];
//! the stats call deliberately does not retry.

use crate::client::ClientManager;
use crate::downloader::{ConcurrencyGate, DownloadError, RetryPolicy};
use crate::registry::DataTypeRegistry;
use crate::shutdown::CancelToken;
use crate::DataType;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One value of the participant-stats map. Other fields of the payload are
/// ignored; only the participant id is consumed.
#[derive(Debug, Deserialize)]
struct ParticipantStat {
    #[serde(rename = "participantId")]
    participant_id: String,
}

/// Outcome of a single download task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Response body, written verbatim as CSV bytes by the caller.
    Downloaded(Vec<u8>),
    /// Cancellation was observed after acquiring the request permit; no
    /// request was issued.
    Cancelled,
}

/// Authenticated Chronicle API client for one orchestration run.
pub struct ChronicleApi {
    registry: DataTypeRegistry,
    clients: ClientManager,
    gate: ConcurrencyGate,
    retry: RetryPolicy,
    bearer_token: String,
}

impl ChronicleApi {
    /// Create an API client with production gate and retry settings.
    pub fn new(registry: DataTypeRegistry, bearer_token: impl Into<String>) -> Self {
        Self {
            registry,
            clients: ClientManager::new(),
            gate: ConcurrencyGate::new(),
            retry: RetryPolicy::default(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the concurrency gate.
    pub fn with_gate(mut self, gate: ConcurrencyGate) -> Self {
        self.gate = gate;
        self
    }

    /// The registry this client resolves URLs against.
    pub fn registry(&self) -> &DataTypeRegistry {
        &self.registry
    }

    /// Enumerate participant ids from the study's stats endpoint.
    ///
    /// The payload is a JSON map keyed arbitrarily; each value carries a
    /// `participantId`. This call is not retried: only per-file downloads
    /// retry transient failures.
    pub async fn participant_stats(&self, study_id: &str) -> Result<Vec<String>, DownloadError> {
        let url = self.registry.stats_url(study_id);
        let _permit = self.gate.acquire().await?;

        debug!(%url, "Requesting participant stats");
        let client = self.clients.acquire().await?;
        let response = client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .send()
            .await
            .map_err(|e| DownloadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                code: status.as_u16(),
                description: RetryPolicy::status_description(status).to_string(),
            });
        }

        let stats: HashMap<String, ParticipantStat> = response
            .json()
            .await
            .map_err(|e| DownloadError::Parse(format!("participant stats payload: {e}")))?;

        Ok(stats
            .into_values()
            .map(|stat| stat.participant_id)
            .collect())
    }

    /// Download one data-type export for one participant.
    ///
    /// Retries transient failures once with exponential backoff; a
    /// transport-level failure additionally recreates the HTTP client
    /// before the retry. The cancel token is checked after acquiring the
    /// request permit; an in-flight request is never aborted.
    pub async fn download_participant_data(
        &self,
        study_id: &str,
        participant_id: &str,
        data_type: DataType,
        cancel: &CancelToken,
    ) -> Result<TaskOutcome, DownloadError> {
        let resolved = self.registry.resolve(data_type, study_id, participant_id);
        let mut attempt: u32 = 0;

        loop {
            let permit = self.gate.acquire().await?;
            if cancel.is_cancelled() {
                debug!(
                    participant_id,
                    data_type = %data_type,
                    "Cancellation observed before dispatch"
                );
                return Ok(TaskOutcome::Cancelled);
            }

            let result = self.request_csv(&resolved.url).await;
            drop(permit);

            match result {
                Ok(body) => {
                    debug!(
                        participant_id,
                        data_type = %data_type,
                        bytes = body.len(),
                        "Downloaded {} for participant {}",
                        resolved.label,
                        participant_id
                    );
                    self.gate.pause_after_success().await;
                    return Ok(TaskOutcome::Downloaded(body));
                }
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    let backoff = self.retry.backoff_delay(attempt);
                    attempt += 1;
                    warn!(
                        participant_id,
                        data_type = %data_type,
                        attempt,
                        max_attempts = self.retry.max_retries() + 1,
                        backoff_ms = backoff.as_millis(),
                        "Retryable error, backing off: {err}"
                    );

                    if matches!(err, DownloadError::Transport(_)) {
                        // A broken connection poisons the pooled client.
                        self.clients.recreate().await;
                    }

                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Issue one GET and return the response body bytes.
    async fn request_csv(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let client = self.clients.acquire().await?;
        let response = client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .send()
            .await
            .map_err(|e| DownloadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                code: status.as_u16(),
                description: RetryPolicy::status_description(status).to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }

    /// Release the HTTP client. Idempotent; called unconditionally at the
    /// end of a run.
    pub async fn close(&self) {
        self.clients.close().await;
    }
}
