//! Integration tests for the organize pass

use chronicle_bulk_downloader::organizer::{ArchivalOrganizer, Category};
use std::fs;
use tempfile::TempDir;

const RAW_FILE: &str = "P1 Chronicle Android Raw Data 01-02-2024.csv";
const SURVEY_FILE: &str = "P1 Chronicle Android Survey Data 01-02-2024.csv";
const IOS_FILE: &str = "P1 Chronicle iPhone IOSSensor Data 01-02-2024.csv";
const PREPROCESSED_FILE: &str = "P1 Chronicle Android Preprocessed Data 01-02-2024.csv";
const DIARY_FILE: &str = "P1 Chronicle Time Use Diary Daytime Data 01-02-2024.csv";

/// Every selected category gets its folder and its files; unselected
/// categories get neither.
#[test]
fn test_selected_categories_organized() {
    let dir = TempDir::new().unwrap();
    for name in [RAW_FILE, SURVEY_FILE, IOS_FILE, PREPROCESSED_FILE, DIARY_FILE] {
        fs::write(dir.path().join(name), "a,b\n").unwrap();
    }

    let organizer = ArchivalOrganizer::new(
        dir.path(),
        vec![Category::Raw, Category::Diary],
        false,
    );
    organizer.organize().unwrap();

    assert!(dir
        .path()
        .join("Chronicle Android Raw Data Downloads")
        .join(RAW_FILE)
        .exists());
    assert!(dir
        .path()
        .join("Chronicle Time Use Diary Data Downloads")
        .join(DIARY_FILE)
        .exists());
    assert!(!dir.path().join(RAW_FILE).exists());
    assert!(!dir.path().join(DIARY_FILE).exists());

    // Unselected categories: no folder created, files stay loose.
    assert!(!dir.path().join("Chronicle Android Survey Data Downloads").exists());
    assert!(!dir.path().join("Chronicle iOS Sensor Data Downloads").exists());
    assert!(dir.path().join(SURVEY_FILE).exists());
    assert!(dir.path().join(IOS_FILE).exists());
}

/// A destination folder left over from an earlier run keeps receiving
/// files even when its category is not selected this run.
#[test]
fn test_existing_destination_still_receives_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Chronicle Android Survey Data Downloads")).unwrap();
    fs::write(dir.path().join(SURVEY_FILE), "s\n").unwrap();

    let organizer = ArchivalOrganizer::new(dir.path(), vec![], false);
    organizer.organize().unwrap();

    assert!(dir
        .path()
        .join("Chronicle Android Survey Data Downloads")
        .join(SURVEY_FILE)
        .exists());
    assert!(!dir.path().join(SURVEY_FILE).exists());
}

/// Already-organized files are not moved again.
#[test]
fn test_organize_is_idempotent() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(RAW_FILE), "a\n").unwrap();

    let organizer = ArchivalOrganizer::new(dir.path(), vec![Category::Raw], false);
    organizer.organize().unwrap();
    organizer.organize().unwrap();

    let organized = dir
        .path()
        .join("Chronicle Android Raw Data Downloads")
        .join(RAW_FILE);
    assert!(organized.exists());
    assert_eq!(fs::read_to_string(&organized).unwrap(), "a\n");
}

/// Files under an Archive subtree are never reorganized.
#[test]
fn test_archived_files_left_alone() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Data Archive").join("Data Archive 01-02-2024");
    fs::create_dir_all(&archive).unwrap();
    fs::write(archive.join(RAW_FILE), "a\n").unwrap();

    let organizer = ArchivalOrganizer::new(dir.path(), vec![Category::Raw], false);
    organizer.organize().unwrap();

    assert!(archive.join(RAW_FILE).exists());
}

/// Zero-byte CSV files are deleted only when the option is enabled.
#[test]
fn test_zero_byte_deletion_enabled() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(RAW_FILE), "").unwrap();
    fs::write(dir.path().join(SURVEY_FILE), "has,content\n").unwrap();

    let organizer = ArchivalOrganizer::new(
        dir.path(),
        vec![Category::Raw, Category::Survey],
        true,
    );
    organizer.organize().unwrap();

    // The empty raw file was moved into its folder, then deleted.
    assert!(!dir
        .path()
        .join("Chronicle Android Raw Data Downloads")
        .join(RAW_FILE)
        .exists());
    assert!(dir
        .path()
        .join("Chronicle Android Survey Data Downloads")
        .join(SURVEY_FILE)
        .exists());
}

#[test]
fn test_zero_byte_deletion_disabled() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(RAW_FILE), "").unwrap();

    let organizer = ArchivalOrganizer::new(dir.path(), vec![Category::Raw], false);
    organizer.organize().unwrap();

    assert!(dir
        .path()
        .join("Chronicle Android Raw Data Downloads")
        .join(RAW_FILE)
        .exists());
}
