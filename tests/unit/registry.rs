//! Unit tests for the data-type registry

use chronicle_bulk_downloader::registry::DataTypeRegistry;
use chronicle_bulk_downloader::{DataType, DeviceType};
use chrono::NaiveDate;

#[test]
fn test_participant_data_family_urls() {
    let registry = DataTypeRegistry::with_base_url("http://localhost:1");
    for data_type in [
        DataType::Raw,
        DataType::Preprocessed,
        DataType::Survey,
        DataType::IosSensor,
    ] {
        let resolved = registry.resolve(data_type, "study-a", "participant-b");
        assert_eq!(
            resolved.url,
            format!(
                "http://localhost:1/chronicle/v3/study/study-a/participants/data?participantId=participant-b&dataType={}&fileType=csv",
                data_type.api_value()
            )
        );
    }
}

#[test]
fn test_time_use_diary_family_urls() {
    let registry = DataTypeRegistry::with_base_url("http://localhost:1");
    for data_type in [
        DataType::DiaryDaytime,
        DataType::DiaryNighttime,
        DataType::DiarySummarized,
    ] {
        let resolved = registry.resolve(data_type, "study-a", "participant-b");
        assert_eq!(
            resolved.url,
            format!(
                "http://localhost:1/chronicle/v3/time-use-diary/study-a/participants/data?participantId=participant-b&dataType={}",
                data_type.api_value()
            )
        );
        assert!(!resolved.url.contains("fileType"));
    }
}

#[test]
fn test_device_tags() {
    assert_eq!(
        DataTypeRegistry::device_type(DataType::Raw),
        Some(DeviceType::Android)
    );
    assert_eq!(
        DataTypeRegistry::device_type(DataType::Preprocessed),
        Some(DeviceType::Android)
    );
    assert_eq!(
        DataTypeRegistry::device_type(DataType::Survey),
        Some(DeviceType::Android)
    );
    assert_eq!(
        DataTypeRegistry::device_type(DataType::IosSensor),
        Some(DeviceType::Iphone)
    );
    assert_eq!(DataTypeRegistry::device_type(DataType::DiaryDaytime), None);
    assert_eq!(DataTypeRegistry::device_type(DataType::DiaryNighttime), None);
    assert_eq!(DataTypeRegistry::device_type(DataType::DiarySummarized), None);
}

#[test]
fn test_output_filenames_for_all_types() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let cases = [
        (DataType::Raw, "P1 Chronicle Android Raw Data 03-07-2024.csv"),
        (
            DataType::Preprocessed,
            "P1 Chronicle Android Preprocessed Data 03-07-2024.csv",
        ),
        (
            DataType::Survey,
            "P1 Chronicle Android Survey Data 03-07-2024.csv",
        ),
        (
            DataType::IosSensor,
            "P1 Chronicle iPhone IOSSensor Data 03-07-2024.csv",
        ),
        (
            DataType::DiaryDaytime,
            "P1 Chronicle Time Use Diary Daytime Data 03-07-2024.csv",
        ),
        (
            DataType::DiaryNighttime,
            "P1 Chronicle Time Use Diary Nighttime Data 03-07-2024.csv",
        ),
        (
            DataType::DiarySummarized,
            "P1 Chronicle Time Use Diary Summarized Data 03-07-2024.csv",
        ),
    ];

    for (data_type, expected) in cases {
        assert_eq!(
            DataTypeRegistry::output_filename("P1", data_type, date),
            expected
        );
    }
}

#[test]
fn test_filename_date_is_zero_padded() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
    let name = DataTypeRegistry::output_filename("P1", DataType::Raw, date);
    assert!(name.ends_with("01-09-2025.csv"));
}
