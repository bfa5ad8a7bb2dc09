//! Data-type registry: URL templates, output labels, and device tags
//!
//! The registry is the single place that knows how a [`DataType`] maps onto
//! the Chronicle API and onto output filenames. URL construction is a lookup
//! over the closed enum rather than a branch statement that grows with each
//! new variant.

use crate::{DataType, DeviceType};
use chrono::NaiveDate;

/// Production Chronicle API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.getmethodic.com";

/// Which of the two URL template families a data type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlFamily {
    /// `/chronicle/v3/study/{id}/participants/data` with `fileType=csv`
    ParticipantData,
    /// `/chronicle/v3/time-use-diary/{id}/participants/data`, no `fileType`
    TimeUseDiary,
}

/// Static registry entry for one data type.
struct RegistryEntry {
    label: &'static str,
    device_type: Option<DeviceType>,
    family: UrlFamily,
}

/// A resolved download target for one (participant, data type) task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    /// Fully constructed request URL.
    pub url: String,
    /// Human-readable output label, used in the output filename.
    pub label: &'static str,
    /// Device tag for the filename, when the data type carries one.
    pub device_type: Option<DeviceType>,
}

fn entry(data_type: DataType) -> RegistryEntry {
    match data_type {
        DataType::Raw => RegistryEntry {
            label: "Raw Data",
            device_type: Some(DeviceType::Android),
            family: UrlFamily::ParticipantData,
        },
        DataType::Preprocessed => RegistryEntry {
            label: "Preprocessed Data",
            device_type: Some(DeviceType::Android),
            family: UrlFamily::ParticipantData,
        },
        DataType::Survey => RegistryEntry {
            label: "Survey Data",
            device_type: Some(DeviceType::Android),
            family: UrlFamily::ParticipantData,
        },
        DataType::IosSensor => RegistryEntry {
            label: "IOSSensor Data",
            device_type: Some(DeviceType::Iphone),
            family: UrlFamily::ParticipantData,
        },
        DataType::DiaryDaytime => RegistryEntry {
            label: "Time Use Diary Daytime Data",
            device_type: None,
            family: UrlFamily::TimeUseDiary,
        },
        DataType::DiaryNighttime => RegistryEntry {
            label: "Time Use Diary Nighttime Data",
            device_type: None,
            family: UrlFamily::TimeUseDiary,
        },
        DataType::DiarySummarized => RegistryEntry {
            label: "Time Use Diary Summarized Data",
            device_type: None,
            family: UrlFamily::TimeUseDiary,
        },
    }
}

/// Lookup table mapping data types to URLs, labels, and device tags.
///
/// Holds no mutable state; the base URL is injectable so tests can point the
/// registry at a local mock server.
#[derive(Debug, Clone)]
pub struct DataTypeRegistry {
    base_url: String,
}

impl DataTypeRegistry {
    /// Create a registry against the production API base URL.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Create a registry against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Resolve one (participant, data type) task to its download target.
    pub fn resolve(
        &self,
        data_type: DataType,
        study_id: &str,
        participant_id: &str,
    ) -> ResolvedDownload {
        let entry = entry(data_type);
        let url = match entry.family {
            UrlFamily::ParticipantData => format!(
                "{}/chronicle/v3/study/{}/participants/data?participantId={}&dataType={}&fileType=csv",
                self.base_url,
                study_id,
                participant_id,
                data_type.api_value()
            ),
            UrlFamily::TimeUseDiary => format!(
                "{}/chronicle/v3/time-use-diary/{}/participants/data?participantId={}&dataType={}",
                self.base_url,
                study_id,
                participant_id,
                data_type.api_value()
            ),
        };

        ResolvedDownload {
            url,
            label: entry.label,
            device_type: entry.device_type,
        }
    }

    /// URL of the participant-stats endpoint for a study.
    pub fn stats_url(&self, study_id: &str) -> String {
        format!(
            "{}/chronicle/v3/study/{}/participants/stats",
            self.base_url, study_id
        )
    }

    /// Output label for a data type.
    pub fn label(data_type: DataType) -> &'static str {
        entry(data_type).label
    }

    /// Device tag for a data type, if it carries one.
    pub fn device_type(data_type: DataType) -> Option<DeviceType> {
        entry(data_type).device_type
    }

    /// Output filename for one downloaded export.
    ///
    /// Format: `{participantId} Chronicle[ {DeviceType}] {Label} {MM-DD-YYYY}.csv`,
    /// with the device segment present only for device-tagged variants. The
    /// date is zero-padded; callers pass the local calendar date at write
    /// time.
    pub fn output_filename(participant_id: &str, data_type: DataType, date: NaiveDate) -> String {
        let entry = entry(data_type);
        let date_str = date.format("%m-%d-%Y");
        match entry.device_type {
            Some(device) => format!(
                "{participant_id} Chronicle {device} {} {date_str}.csv",
                entry.label
            ),
            None => format!("{participant_id} Chronicle {} {date_str}.csv", entry.label),
        }
    }
}

impl Default for DataTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
