//! Archival and organization passes over the download folder
//!
//! Two independent passes run after a successful download phase, in order:
//! [`ArchivalOrganizer::archive`] moves stale dated exports into per-date
//! archive subfolders, then [`ArchivalOrganizer::organize`] classifies loose
//! exports into per-category folders and optionally deletes zero-byte CSV
//! files. Both passes exclude anything already under an "Archive" subtree,
//! which also makes archiving idempotent.

mod archive;
pub mod classify;
mod organize;

pub use classify::{Category, FileClassifier};

use crate::StudyParameters;
use std::fs;
use std::path::{Path, PathBuf};

/// Archival and organization errors
#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    /// A filename carries a date token that matches the scan pattern but
    /// parses under neither accepted format. The file was altered while the
    /// run was in progress; the archival pass aborts for safety.
    #[error("file {0} possibly altered while the downloader was running, please avoid doing this")]
    CorruptedFilename(PathBuf),

    /// A scan pattern failed to compile
    #[error("pattern error: {0}")]
    Pattern(String),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(String),
}

/// Runs the archive and organize passes for one download folder.
#[derive(Debug, Clone)]
pub struct ArchivalOrganizer {
    download_folder: PathBuf,
    selected: Vec<Category>,
    delete_zero_byte_files: bool,
}

impl ArchivalOrganizer {
    /// Create an organizer for a folder with an explicit category selection.
    pub fn new(
        download_folder: impl Into<PathBuf>,
        selected: Vec<Category>,
        delete_zero_byte_files: bool,
    ) -> Self {
        Self {
            download_folder: download_folder.into(),
            selected,
            delete_zero_byte_files,
        }
    }

    /// Derive the organizer from run parameters: destination folders are
    /// created only for categories actually selected this run.
    pub fn from_params(params: &StudyParameters) -> Self {
        let selected = Category::ALL
            .into_iter()
            .filter(|category| {
                params
                    .selected_types()
                    .iter()
                    .any(|dt| Category::of_data_type(*dt) == *category)
            })
            .collect();

        Self::new(
            params.download_folder.clone(),
            selected,
            params.delete_zero_byte_files,
        )
    }

    /// The folder this organizer operates on.
    pub fn download_folder(&self) -> &Path {
        &self.download_folder
    }

    /// Categories whose destination folders are created this run.
    pub fn selected(&self) -> &[Category] {
        &self.selected
    }
}

/// Recursively collect files under `root` whose name satisfies `matches`,
/// skipping any path that contains one of the `ignore` fragments.
///
/// Results are sorted for deterministic processing order.
pub(crate) fn collect_files(
    root: &Path,
    ignore: &[&str],
    matches: &dyn Fn(&str) -> bool,
) -> Result<Vec<PathBuf>, OrganizerError> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .map_err(|e| OrganizerError::Io(format!("failed to read {}: {e}", dir.display())))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| OrganizerError::Io(format!("failed to read {}: {e}", dir.display())))?;
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if ignore.iter().any(|fragment| path_str.contains(fragment)) {
                continue;
            }

            if path.is_dir() {
                pending.push(path);
            } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if matches(name) {
                    found.push(path);
                }
            }
        }
    }

    found.sort();
    Ok(found)
}
