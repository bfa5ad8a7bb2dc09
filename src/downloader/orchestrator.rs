//! Download orchestration state machine
//!
//! One orchestrator instance drives one run: validate, enumerate
//! participants, filter, dispatch every (participant, data type) task
//! through the concurrency gate in fixed order, then archive and organize
//! the download folder. The client handle is released on every exit path.

use super::progress::{EventSink, ProgressReporter, RunState};
use super::{DownloadError, RetryPolicy};
use crate::api::{ChronicleApi, TaskOutcome};
use crate::downloader::ConcurrencyGate;
use crate::filter;
use crate::organizer::ArchivalOrganizer;
use crate::registry::DataTypeRegistry;
use crate::shutdown::SharedCancel;
use crate::{DataType, StudyParameters};
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Drives one complete download run.
pub struct DownloadOrchestrator {
    params: StudyParameters,
    api: ChronicleApi,
    organizer: ArchivalOrganizer,
    state: RunState,
}

impl DownloadOrchestrator {
    /// Create an orchestrator against the production API.
    pub fn new(params: StudyParameters) -> Self {
        Self::with_registry(params, DataTypeRegistry::new())
    }

    /// Create an orchestrator against a custom registry (tests point this
    /// at a local mock server).
    pub fn with_registry(params: StudyParameters, registry: DataTypeRegistry) -> Self {
        let api = ChronicleApi::new(registry, params.bearer_token.clone());
        let organizer = ArchivalOrganizer::from_params(&params);
        Self {
            params,
            api,
            organizer,
            state: RunState::Idle,
        }
    }

    /// Override the retry policy (tests shrink the backoff base).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.api = self.api.with_retry_policy(retry);
        self
    }

    /// Override the concurrency gate (tests shrink the inter-request pause).
    pub fn with_gate(mut self, gate: ConcurrencyGate) -> Self {
        self.api = self.api.with_gate(gate);
        self
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run to a terminal state.
    ///
    /// Emits progress, then exactly one terminal notification (`completed`,
    /// `cancelled`, or `error`) through the sink. The client handle is
    /// closed unconditionally before the terminal notification fires.
    pub async fn run(
        &mut self,
        cancel: SharedCancel,
        sink: Arc<dyn EventSink>,
    ) -> Result<RunState, DownloadError> {
        let span = tracing::info_span!("download_run", study_id = %self.params.study_id);

        self.state = RunState::Running;
        let result = async {
            let result = self.execute(&cancel, sink.as_ref()).await;

            // Guaranteed cleanup: the client never outlives the run.
            self.api.close().await;
            result
        }
        .instrument(span)
        .await;

        match result {
            Ok(RunState::Cancelled) => {
                self.state = RunState::Cancelled;
                info!("Download process cancelled by user");
                sink.cancelled();
                Ok(RunState::Cancelled)
            }
            Ok(_) => {
                self.state = RunState::Completed;
                info!("Data download complete");
                sink.completed();
                Ok(RunState::Completed)
            }
            Err(err) => {
                self.state = RunState::Failed;
                warn!("Download run failed: {err}");
                sink.error(&err.user_message());
                Err(err)
            }
        }
    }

    async fn execute(
        &mut self,
        cancel: &SharedCancel,
        sink: &dyn EventSink,
    ) -> Result<RunState, DownloadError> {
        self.params.validate().map_err(DownloadError::Validation)?;
        sink.progress(0, "Starting download");

        let participant_ids = self.api.participant_stats(&self.params.study_id).await?;
        let filtered = filter::apply(
            &participant_ids,
            self.params.filter_mode,
            &self.params.filter_list,
        )?;

        let selected_types = self.params.selected_types();
        let total = (filtered.len() * selected_types.len()) as u64;
        let mut completed: u64 = 0;

        info!(
            participants = filtered.len(),
            data_types = selected_types.len(),
            total,
            "Starting downloads"
        );

        let (percent, text) = ProgressReporter::task_progress(completed, total);
        sink.progress(percent, &text);

        'participants: for (index, participant_id) in filtered.iter().enumerate() {
            for data_type in &selected_types {
                if cancel.is_cancelled() {
                    self.state = RunState::Cancelling;
                    break 'participants;
                }

                match self.download_task(participant_id, *data_type, cancel).await? {
                    TaskOutcome::Cancelled => {
                        self.state = RunState::Cancelling;
                        break 'participants;
                    }
                    TaskOutcome::Downloaded(_) => {
                        completed += 1;
                        let (percent, text) = ProgressReporter::task_progress(completed, total);
                        sink.progress(percent, &text);
                        debug!(
                            participant_id = %participant_id,
                            data_type = %data_type,
                            "Finished download ({}/{})",
                            index + 1,
                            filtered.len()
                        );
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Ok(RunState::Cancelled);
        }

        sink.progress(90, &format!("Downloaded {completed} of {total} files"));
        self.organizer.archive()?;

        sink.progress(95, "Organizing downloaded files");
        self.organizer.organize()?;

        sink.progress(100, &ProgressReporter::completion_text(total));
        Ok(RunState::Completed)
    }

    /// Download one task and write its body to the output file.
    async fn download_task(
        &self,
        participant_id: &str,
        data_type: DataType,
        cancel: &SharedCancel,
    ) -> Result<TaskOutcome, DownloadError> {
        let outcome = self
            .api
            .download_participant_data(&self.params.study_id, participant_id, data_type, cancel)
            .await?;

        if let TaskOutcome::Downloaded(body) = &outcome {
            let filename = DataTypeRegistry::output_filename(
                participant_id,
                data_type,
                Local::now().date_naive(),
            );
            let path = self.params.download_folder.join(filename);

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DownloadError::Io(format!("failed to create {}: {e}", parent.display())))?;
            }

            tokio::fs::write(&path, body)
                .await
                .map_err(|e| DownloadError::Io(format!("failed to write {}: {e}", path.display())))?;
        }

        Ok(outcome)
    }
}
