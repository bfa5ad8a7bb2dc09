//! Integration tests for the archival pass

use chronicle_bulk_downloader::organizer::{ArchivalOrganizer, Category, OrganizerError};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn organizer(dir: &Path) -> ArchivalOrganizer {
    ArchivalOrganizer::new(dir, vec![Category::Raw], false)
}

fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).unwrap().filter_map(Result::ok) {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                count += 1;
            }
        }
    }
    count
}

/// A file dated before today is copied into the per-date archive folder
/// and the original is deleted.
#[test]
fn test_stale_file_archived() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("P1 Chronicle Android Raw Data 01-02-2024.csv");
    fs::write(&file, "a,b\n").unwrap();

    organizer(dir.path()).archive().unwrap();

    assert!(!file.exists());

    let parent_name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    let archived = dir
        .path()
        .join(format!("{parent_name} Archive"))
        .join(format!("{parent_name} Archive 01-02-2024"))
        .join("P1 Chronicle Android Raw Data 01-02-2024.csv");
    assert!(archived.exists());
    assert_eq!(fs::read_to_string(&archived).unwrap(), "a,b\n");
}

/// Dot-separated date tokens parse through the second format.
#[test]
fn test_dot_separated_date_archived() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("P1 Chronicle Android Raw Data 01.02.2024.csv");
    fs::write(&file, "x\n").unwrap();

    organizer(dir.path()).archive().unwrap();
    assert!(!file.exists());

    let parent_name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir
        .path()
        .join(format!("{parent_name} Archive"))
        .join(format!("{parent_name} Archive 01.02.2024"))
        .join("P1 Chronicle Android Raw Data 01.02.2024.csv")
        .exists());
}

/// A file dated today stays in place.
#[test]
fn test_today_file_not_archived() {
    let dir = TempDir::new().unwrap();
    let today = Local::now().date_naive().format("%m-%d-%Y");
    let file = dir
        .path()
        .join(format!("P1 Chronicle Android Raw Data {today}.csv"));
    fs::write(&file, "x\n").unwrap();

    organizer(dir.path()).archive().unwrap();
    assert!(file.exists());
}

/// Running the archival pass twice produces no additional moves:
/// already-archived paths are excluded from the scan.
#[test]
fn test_archive_is_idempotent() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("P1 Chronicle Android Raw Data 01-02-2024.csv"),
        "a\n",
    )
    .unwrap();

    let organizer = organizer(dir.path());
    organizer.archive().unwrap();
    let after_first = count_files(dir.path());

    organizer.archive().unwrap();
    assert_eq!(count_files(dir.path()), after_first);
}

/// A date token matching the scan pattern that parses under neither format
/// aborts the pass: the file was altered while the run was in progress.
#[test]
fn test_corrupted_filename_aborts() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("P1 Chronicle Android Raw Data 01-02-2024.csv");
    fs::write(&good, "a\n").unwrap();
    fs::write(
        dir.path().join("P1 Chronicle Android Raw Data 13-45-2024.csv"),
        "b\n",
    )
    .unwrap();

    let err = organizer(dir.path()).archive().unwrap_err();
    assert!(matches!(err, OrganizerError::CorruptedFilename(_)));
}

/// Image files are excluded from the archival scan.
#[test]
fn test_png_files_ignored() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("P1 Chronicle Android Raw Data 01-02-2024.png");
    fs::write(&file, "img").unwrap();

    organizer(dir.path()).archive().unwrap();
    assert!(file.exists());
}

/// Files in nested subfolders archive relative to their own parent folder.
#[test]
fn test_nested_file_archives_under_its_parent() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("Exports");
    fs::create_dir_all(&nested).unwrap();
    let file = nested.join("P1 Chronicle Android Survey Data 02-03-2024.csv");
    fs::write(&file, "s\n").unwrap();

    organizer(dir.path()).archive().unwrap();

    assert!(!file.exists());
    assert!(nested
        .join("Exports Archive")
        .join("Exports Archive 02-03-2024")
        .join("P1 Chronicle Android Survey Data 02-03-2024.csv")
        .exists());
}

/// Archiving against an explicit cutoff leaves files dated on or after the
/// cutoff alone.
#[test]
fn test_archive_as_of_cutoff() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("P1 Chronicle Android Raw Data 01-02-2024.csv");
    fs::write(&file, "a\n").unwrap();

    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    organizer(dir.path()).archive_as_of(cutoff).unwrap();
    assert!(file.exists());

    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    organizer(dir.path()).archive_as_of(cutoff).unwrap();
    assert!(!file.exists());
}
