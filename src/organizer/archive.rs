//! Archival pass: move stale dated exports into per-date archive folders

use super::{collect_files, ArchivalOrganizer, OrganizerError};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::fs;
use tracing::{debug, info};

/// The two-separator date token embedded in export filenames.
const DATE_TOKEN_PATTERN: &str = r"(\d{2}[.-]\d{2}[.-]\d{4})";

/// Scan pattern for dated CSV exports.
const DATED_FILE_PATTERN: &str = r"[\s\S]*(\d{2}[.-]\d{2}[.-]\d{4})[\s\S]*\.csv";

/// Parse a date token, `MM-DD-YYYY` first, then `MM.DD.YYYY`.
fn parse_date_token(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, "%m-%d-%Y")
        .or_else(|_| NaiveDate::parse_from_str(token, "%m.%d.%Y"))
        .ok()
}

impl ArchivalOrganizer {
    /// Archive every dated export older than today's local date.
    ///
    /// Scans the download folder recursively, excluding anything under an
    /// "Archive" subtree and image files. A file whose date token matches
    /// the scan pattern but parses under neither format aborts the pass
    /// with [`OrganizerError::CorruptedFilename`]; already-downloaded files
    /// are left intact.
    pub fn archive(&self) -> Result<(), OrganizerError> {
        self.archive_as_of(Local::now().date_naive())
    }

    /// Archive pass against an explicit "today", for deterministic tests.
    pub fn archive_as_of(&self, today: NaiveDate) -> Result<(), OrganizerError> {
        let token_re =
            Regex::new(DATE_TOKEN_PATTERN).map_err(|e| OrganizerError::Pattern(e.to_string()))?;
        let dated_re =
            Regex::new(DATED_FILE_PATTERN).map_err(|e| OrganizerError::Pattern(e.to_string()))?;

        let dated_files = collect_files(self.download_folder(), &["Archive", ".png"], &|name| {
            dated_re.is_match(name)
        })?;

        for file in dated_files {
            let name = match file.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            let token = token_re
                .find(&name)
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| OrganizerError::CorruptedFilename(file.clone()))?;

            let file_date = parse_date_token(&token)
                .ok_or_else(|| OrganizerError::CorruptedFilename(file.clone()))?;

            if file_date >= today {
                continue;
            }

            let parent = file
                .parent()
                .ok_or_else(|| OrganizerError::Io(format!("{} has no parent", file.display())))?;
            let parent_name = parent
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            let archive_dir = parent
                .join(format!("{parent_name} Archive"))
                .join(format!("{parent_name} Archive {token}"));

            fs::create_dir_all(&archive_dir).map_err(|e| {
                OrganizerError::Io(format!("failed to create {}: {e}", archive_dir.display()))
            })?;

            // Copy-then-delete rather than rename so archives may live on a
            // different device than the download folder.
            fs::copy(&file, archive_dir.join(&name)).map_err(|e| {
                OrganizerError::Io(format!("failed to copy {}: {e}", file.display()))
            })?;
            fs::remove_file(&file).map_err(|e| {
                OrganizerError::Io(format!("failed to remove {}: {e}", file.display()))
            })?;

            debug!(file = %file.display(), token, "Archived outdated export");
        }

        info!("Finished archiving outdated Chronicle data");
        Ok(())
    }
}
