//! CLI error types and conversions

use crate::app_config::ConfigError;
use crate::downloader::DownloadError;
use crate::filter::FilterError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Download error
    #[error("download error: {0}")]
    DownloadError(#[from] DownloadError),

    /// Filter error
    #[error("filter error: {0}")]
    FilterError(#[from] FilterError),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Background worker failed
    #[error("worker error: {0}")]
    WorkerError(String),
}
