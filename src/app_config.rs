//! Persisted JSON configuration
//!
//! The CLI reads this file at startup and writes it back after a successful
//! run. The core consumes it only through [`AppConfig::to_parameters`]; the
//! bearer token is never persisted and is supplied per run.

use crate::{DataType, FilterMode, StudyParameters};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default configuration filename next to the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "Chronicle_bulk_data_downloader_config.json";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read or written
    #[error("config IO error: {0}")]
    Io(String),

    /// Configuration file is not valid JSON
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Persisted run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Folder that receives the downloaded files
    #[serde(default)]
    pub download_folder: String,
    /// Chronicle study identifier
    #[serde(default)]
    pub study_id: String,
    /// Raw comma-separated participant filter text
    #[serde(default)]
    pub participant_ids_to_filter: String,
    /// Inclusive filter selected
    #[serde(default)]
    pub inclusive_checked: bool,
    /// Raw data selected
    #[serde(default)]
    pub raw_checked: bool,
    /// Preprocessed data selected
    #[serde(default)]
    pub preprocessed_checked: bool,
    /// Survey data selected
    #[serde(default)]
    pub survey_checked: bool,
    /// iOS sensor data selected
    #[serde(default)]
    pub ios_sensor_checked: bool,
    /// Daytime diary selected
    #[serde(default)]
    pub time_use_diary_daytime_checked: bool,
    /// Nighttime diary selected
    #[serde(default)]
    pub time_use_diary_nighttime_checked: bool,
    /// Summarized diary selected
    #[serde(default)]
    pub time_use_diary_summarized_checked: bool,
    /// Zero-byte deletion enabled
    #[serde(default)]
    pub delete_zero_byte_files_checked: bool,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Write configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| ConfigError::Io(format!("failed to write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Convert into run parameters, supplying the bearer token separately.
    pub fn to_parameters(&self, bearer_token: impl Into<String>) -> StudyParameters {
        let mut data_types = Vec::new();
        if self.raw_checked {
            data_types.push(DataType::Raw);
        }
        if self.preprocessed_checked {
            data_types.push(DataType::Preprocessed);
        }
        if self.survey_checked {
            data_types.push(DataType::Survey);
        }
        if self.ios_sensor_checked {
            data_types.push(DataType::IosSensor);
        }
        if self.time_use_diary_daytime_checked {
            data_types.push(DataType::DiaryDaytime);
        }
        if self.time_use_diary_nighttime_checked {
            data_types.push(DataType::DiaryNighttime);
        }
        if self.time_use_diary_summarized_checked {
            data_types.push(DataType::DiarySummarized);
        }

        let filter_mode = if self.inclusive_checked {
            FilterMode::Inclusive
        } else {
            FilterMode::Exclusive
        };

        let filter_list = self
            .participant_ids_to_filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        StudyParameters {
            study_id: self.study_id.trim().to_string(),
            bearer_token: bearer_token.into(),
            download_folder: self.download_folder.clone().into(),
            data_types,
            filter_mode,
            filter_list,
            delete_zero_byte_files: self.delete_zero_byte_files_checked,
        }
    }

    /// Capture run parameters back into persistable form.
    pub fn from_parameters(params: &StudyParameters) -> Self {
        Self {
            download_folder: params.download_folder.to_string_lossy().into_owned(),
            study_id: params.study_id.clone(),
            participant_ids_to_filter: params.filter_list.join(","),
            inclusive_checked: params.filter_mode == FilterMode::Inclusive,
            raw_checked: params.data_types.contains(&DataType::Raw),
            preprocessed_checked: params.data_types.contains(&DataType::Preprocessed),
            survey_checked: params.data_types.contains(&DataType::Survey),
            ios_sensor_checked: params.data_types.contains(&DataType::IosSensor),
            time_use_diary_daytime_checked: params.data_types.contains(&DataType::DiaryDaytime),
            time_use_diary_nighttime_checked: params.data_types.contains(&DataType::DiaryNighttime),
            time_use_diary_summarized_checked: params
                .data_types
                .contains(&DataType::DiarySummarized),
            delete_zero_byte_files_checked: params.delete_zero_byte_files,
        }
    }
}
