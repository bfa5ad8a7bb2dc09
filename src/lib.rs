//! # Chronicle Bulk Data Downloader Library
//!
//! A library for bulk-downloading per-participant data exports from the
//! Chronicle study-data API and organizing the downloaded files on disk.
//!
//! ## Features
//!
//! - **Seven Export Types**: raw usage events, preprocessed data, app usage
//!   surveys, iOS sensor data, and three time-use-diary variants
//! - **Participant Filtering**: inclusive/exclusive case-insensitive
//!   substring filters over the study's participant list
//! - **Serialized Requests**: a single-permit gate guarantees at most one
//!   request is in flight against the API at any time
//! - **Bounded Retry**: transient failures (429/502/503/504 and transport
//!   errors) are retried once with exponential backoff
//! - **Cooperative Cancellation**: a shared token checked between requests,
//!   never aborting an in-flight request
//! - **Archival & Organization**: post-run passes that archive stale dated
//!   exports and classify loose files into per-category folders
//!
//! ## Quick Start
//!
//! ```no_run
//! use chronicle_bulk_downloader::downloader::{DownloadOrchestrator, NoopSink};
//! use chronicle_bulk_downloader::shutdown::CancelToken;
//! use chronicle_bulk_downloader::{DataType, FilterMode, StudyParameters};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = StudyParameters {
//!     study_id: "6b7a4a0e-95c1-4f32-9c5b-1a2b3c4d5e6f".to_string(),
//!     bearer_token: "token".to_string(),
//!     download_folder: "./downloads".into(),
//!     data_types: vec![DataType::Raw, DataType::Survey],
//!     filter_mode: FilterMode::Exclusive,
//!     filter_list: Vec::new(),
//!     delete_zero_byte_files: false,
//! };
//!
//! let mut orchestrator = DownloadOrchestrator::new(params);
//! orchestrator
//!     .run(CancelToken::shared(), Arc::new(NoopSink))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`registry`] - Data-type registry: URL templates, labels, device tags
//! - [`filter`] - Participant-id filtering
//! - [`client`] - Shared HTTP client lifecycle management
//! - [`api`] - Chronicle API calls with retry and request serialization
//! - [`downloader`] - Download orchestration, retry policy, progress events
//! - [`organizer`] - Archival and per-category organization passes
//! - [`shutdown`] - Cooperative cancellation token
//! - [`app_config`] - Persisted JSON configuration consumed by the CLI

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Chronicle API calls
pub mod api;

/// Persisted JSON configuration
pub mod app_config;

/// CLI command implementations
pub mod cli;

/// HTTP client lifecycle management
pub mod client;

/// Download orchestration
pub mod downloader;

/// Participant-id filtering
pub mod filter;

/// Archival and organization passes
pub mod organizer;

/// Data-type registry
pub mod registry;

/// Cooperative cancellation
pub mod shutdown;

// Re-export commonly used types
pub use filter::FilterError;
pub use registry::DataTypeRegistry;

/// Minimum length of a Chronicle study identifier (a UUID string).
pub const EXPECTED_STUDY_ID_LENGTH: usize = 36;

/// Device platform associated with certain data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Android devices
    Android,
    /// Apple iPhone devices
    Iphone,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceType::Android => "Android",
            DeviceType::Iphone => "iPhone",
        };
        write!(f, "{s}")
    }
}

/// One of the seven Chronicle data export categories.
///
/// The variant order is the fixed enumeration order used when dispatching
/// download tasks: all tasks for one participant run in this order before
/// the next participant starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Raw usage events
    #[serde(rename = "UsageEvents")]
    Raw,
    /// Preprocessed usage data
    #[serde(rename = "Preprocessed")]
    Preprocessed,
    /// App usage survey responses
    #[serde(rename = "AppUsageSurvey")]
    Survey,
    /// iOS sensor data
    #[serde(rename = "IOSSensor")]
    IosSensor,
    /// Time use diary, daytime variant
    #[serde(rename = "DayTime")]
    DiaryDaytime,
    /// Time use diary, nighttime variant
    #[serde(rename = "NightTime")]
    DiaryNighttime,
    /// Time use diary, summarized variant
    #[serde(rename = "Summarized")]
    DiarySummarized,
}

impl DataType {
    /// All variants in fixed enumeration order.
    pub const ALL: [DataType; 7] = [
        DataType::Raw,
        DataType::Preprocessed,
        DataType::Survey,
        DataType::IosSensor,
        DataType::DiaryDaytime,
        DataType::DiaryNighttime,
        DataType::DiarySummarized,
    ];

    /// Value of the `dataType` query parameter on the wire.
    pub fn api_value(&self) -> &'static str {
        match self {
            DataType::Raw => "UsageEvents",
            DataType::Preprocessed => "Preprocessed",
            DataType::Survey => "AppUsageSurvey",
            DataType::IosSensor => "IOSSensor",
            DataType::DiaryDaytime => "DayTime",
            DataType::DiaryNighttime => "NightTime",
            DataType::DiarySummarized => "Summarized",
        }
    }

    /// Whether this is one of the three time-use-diary variants.
    pub fn is_diary(&self) -> bool {
        matches!(
            self,
            DataType::DiaryDaytime | DataType::DiaryNighttime | DataType::DiarySummarized
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_value())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UsageEvents" => Ok(DataType::Raw),
            "Preprocessed" => Ok(DataType::Preprocessed),
            "AppUsageSurvey" => Ok(DataType::Survey),
            "IOSSensor" => Ok(DataType::IosSensor),
            "DayTime" => Ok(DataType::DiaryDaytime),
            "NightTime" => Ok(DataType::DiaryNighttime),
            "Summarized" => Ok(DataType::DiarySummarized),
            _ => Err(format!("Invalid data type: {s}")),
        }
    }
}

/// Participant filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Keep participants matching none of the filter entries.
    #[default]
    Exclusive,
    /// Keep participants matching at least one filter entry.
    Inclusive,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterMode::Exclusive => "Exclusive",
            FilterMode::Inclusive => "Inclusive",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclusive" => Ok(FilterMode::Exclusive),
            "inclusive" => Ok(FilterMode::Inclusive),
            _ => Err(format!(
                "Invalid filter mode: {s}. Valid options: inclusive, exclusive"
            )),
        }
    }
}

/// Parameters for one orchestration run.
#[derive(Debug, Clone)]
pub struct StudyParameters {
    /// Chronicle study identifier (a UUID string).
    pub study_id: String,
    /// Bearer token sent in the `Authorization` header.
    pub bearer_token: String,
    /// Folder that receives the downloaded files.
    pub download_folder: PathBuf,
    /// Data types selected for download.
    pub data_types: Vec<DataType>,
    /// Participant filter mode.
    pub filter_mode: FilterMode,
    /// Participant-id filter entries (case-insensitive substrings).
    pub filter_list: Vec<String>,
    /// Delete zero-byte CSV files during the organize pass.
    pub delete_zero_byte_files: bool,
}

impl StudyParameters {
    /// Validate run parameters.
    ///
    /// Every check here runs before any network work starts; a failure
    /// short-circuits the run with a validation error.
    pub fn validate(&self) -> Result<(), String> {
        if self.download_folder.as_os_str().is_empty() {
            return Err("Please select a download folder.".to_string());
        }

        if self.study_id.trim().len() < EXPECTED_STUDY_ID_LENGTH {
            return Err("Please enter a valid Chronicle study ID.".to_string());
        }

        if self.selected_types().is_empty() {
            return Err("Please select at least one data type to download.".to_string());
        }

        if self.filter_mode == FilterMode::Inclusive
            && !self.filter_list.iter().any(|f| !f.trim().is_empty())
        {
            return Err(
                "Please enter a valid list of participant IDs to *include* when the *inclusive* filter is selected."
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Selected data types, deduplicated and in fixed enumeration order.
    pub fn selected_types(&self) -> Vec<DataType> {
        DataType::ALL
            .into_iter()
            .filter(|dt| self.data_types.contains(dt))
            .collect()
    }
}
