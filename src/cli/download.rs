//! Download command implementation

use crate::app_config::AppConfig;
use crate::downloader::config::CANCEL_FAILSAFE_TIMEOUT;
use crate::downloader::{DownloadOrchestrator, EventSink, RunState};
use crate::shutdown::SharedCancel;
use crate::FilterMode;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use super::CliError;

/// Command-line interface for the Chronicle bulk data downloader.
#[derive(Debug, Parser)]
#[command(name = "chronicle-bulk-downloader", version, about)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download study data exports and organize the download folder
    Download(DownloadArgs),
}

fn parse_filter_mode(s: &str) -> Result<FilterMode, String> {
    FilterMode::from_str(s)
}

/// Arguments for the download command.
///
/// Arguments given on the command line override values loaded from the
/// `--config` file; the configuration is written back after a successful
/// run.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Chronicle study ID (a UUID)
    #[arg(long)]
    pub study_id: Option<String>,

    /// Bearer token for the Chronicle API
    #[arg(long, conflicts_with = "token_file")]
    pub token: Option<String>,

    /// File containing the bearer token
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Folder that receives the downloaded files
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Download raw usage events
    #[arg(long)]
    pub raw: bool,

    /// Download preprocessed data
    #[arg(long)]
    pub preprocessed: bool,

    /// Download app usage survey data
    #[arg(long)]
    pub survey: bool,

    /// Download iOS sensor data
    #[arg(long)]
    pub ios_sensor: bool,

    /// Download daytime time-use-diary data
    #[arg(long)]
    pub diary_daytime: bool,

    /// Download nighttime time-use-diary data
    #[arg(long)]
    pub diary_nighttime: bool,

    /// Download summarized time-use-diary data
    #[arg(long)]
    pub diary_summarized: bool,

    /// Participant filter mode: inclusive or exclusive
    #[arg(long, value_parser = parse_filter_mode)]
    pub filter_mode: Option<FilterMode>,

    /// Comma-separated participant-id filter entries
    #[arg(long, value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Delete zero-byte CSV files during the organize pass
    #[arg(long)]
    pub delete_zero_byte_files: bool,

    /// JSON configuration file to load defaults from and update on success
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl DownloadArgs {
    fn any_type_flag(&self) -> bool {
        self.raw
            || self.preprocessed
            || self.survey
            || self.ios_sensor
            || self.diary_daytime
            || self.diary_nighttime
            || self.diary_summarized
    }

    /// Merge the config file (if any) with command-line overrides.
    fn merged_config(&self) -> Result<AppConfig, CliError> {
        let mut config = match &self.config {
            Some(path) if path.exists() => AppConfig::load(path)?,
            _ => AppConfig::default(),
        };

        if let Some(study_id) = &self.study_id {
            config.study_id = study_id.clone();
        }
        if let Some(folder) = &self.folder {
            config.download_folder = folder.to_string_lossy().into_owned();
        }
        if !self.filter.is_empty() {
            config.participant_ids_to_filter = self.filter.join(",");
        }
        if let Some(mode) = self.filter_mode {
            config.inclusive_checked = mode == FilterMode::Inclusive;
        }
        if self.any_type_flag() {
            config.raw_checked = self.raw;
            config.preprocessed_checked = self.preprocessed;
            config.survey_checked = self.survey;
            config.ios_sensor_checked = self.ios_sensor;
            config.time_use_diary_daytime_checked = self.diary_daytime;
            config.time_use_diary_nighttime_checked = self.diary_nighttime;
            config.time_use_diary_summarized_checked = self.diary_summarized;
        }
        if self.delete_zero_byte_files {
            config.delete_zero_byte_files_checked = true;
        }

        Ok(config)
    }

    fn bearer_token(&self) -> Result<String, CliError> {
        if let Some(token) = &self.token {
            return Ok(token.trim().to_string());
        }
        if let Some(path) = &self.token_file {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                CliError::InvalidArgument(format!("failed to read {}: {e}", path.display()))
            })?;
            return Ok(contents.trim().to_string());
        }
        Err(CliError::InvalidArgument(
            "a bearer token is required: pass --token or --token-file".to_string(),
        ))
    }

    /// Execute the download command.
    ///
    /// The orchestration runs on a background task; this function renders
    /// its events and waits for a terminal state. After a cancellation
    /// request it waits at most the failsafe window before returning to an
    /// idle prompt, regardless of whether the worker has stopped.
    pub async fn execute(&self, cancel: SharedCancel) -> Result<(), CliError> {
        let config = self.merged_config()?;
        let token = self.bearer_token()?;
        let params = config.to_parameters(token);

        let sink: Arc<dyn EventSink> = Arc::new(ProgressBarSink::new());
        let mut orchestrator = DownloadOrchestrator::new(params.clone());

        let worker_cancel = cancel.clone();
        let worker_sink = sink.clone();
        let mut worker =
            tokio::spawn(async move { orchestrator.run(worker_cancel, worker_sink).await });

        let joined = tokio::select! {
            joined = &mut worker => joined,
            _ = cancel.wait_cancelled() => {
                match tokio::time::timeout(CANCEL_FAILSAFE_TIMEOUT, &mut worker).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!(
                            "Worker did not report completion within the cancellation failsafe window; returning to idle"
                        );
                        return Ok(());
                    }
                }
            }
        };

        let run_result = joined.map_err(|e| CliError::WorkerError(e.to_string()))?;

        match run_result {
            Ok(RunState::Cancelled) => {
                info!("Download cancelled before completion");
                Ok(())
            }
            Ok(_) => {
                if let Some(path) = &self.config {
                    AppConfig::from_parameters(&params).save(path)?;
                }
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Renders download events on an indicatif progress bar.
struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }
}

impl EventSink for ProgressBarSink {
    fn progress(&self, percent: u8, text: &str) {
        self.bar.set_position(percent as u64);
        self.bar.set_message(text.to_string());
    }

    fn error(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }

    fn completed(&self) {
        self.bar.finish();
    }

    fn cancelled(&self) {
        self.bar.abandon_with_message("Download cancelled".to_string());
    }
}
