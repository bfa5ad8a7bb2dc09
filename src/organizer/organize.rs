//! Organize pass: classify loose exports into per-category folders

use super::classify::{Category, FileClassifier};
use super::{collect_files, ArchivalOrganizer, OrganizerError};
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info, warn};

impl ArchivalOrganizer {
    /// Classify loose exports into per-category folders, then optionally
    /// delete zero-byte CSV files.
    ///
    /// A category's destination folder is created only if that category was
    /// selected for download this run (for diary, if any diary sub-type
    /// was). Files are moved copy-then-delete. Anything under an "Archive"
    /// subtree or already inside a destination folder is left alone.
    pub fn organize(&self) -> Result<(), OrganizerError> {
        for category in Category::ALL {
            let destination = self.download_folder().join(category.folder_name());

            if self.selected().contains(&category) {
                fs::create_dir_all(&destination).map_err(|e| {
                    OrganizerError::Io(format!(
                        "failed to create {}: {e}",
                        destination.display()
                    ))
                })?;
            }

            // Without a destination (category never selected, none left
            // over from earlier runs) matching files stay where they are.
            if !destination.is_dir() {
                continue;
            }

            let classifier = FileClassifier::new(category);
            let unorganized = collect_files(
                self.download_folder(),
                &["Archive", category.folder_name()],
                &|name| classifier.matches(name),
            )?;

            for file in unorganized {
                let name = match file.file_name() {
                    Some(name) => name.to_os_string(),
                    None => continue,
                };

                fs::copy(&file, destination.join(&name)).map_err(|e| {
                    OrganizerError::Io(format!("failed to copy {}: {e}", file.display()))
                })?;
                fs::remove_file(&file).map_err(|e| {
                    OrganizerError::Io(format!("failed to remove {}: {e}", file.display()))
                })?;

                debug!(
                    file = %file.display(),
                    category = ?category,
                    "Moved export into category folder"
                );
            }
        }

        if self.delete_zero_byte_files {
            self.delete_zero_byte_csvs()?;
        }

        info!("Finished organizing downloaded Chronicle data");
        Ok(())
    }

    /// Delete empty CSV files outside the Archive tree.
    ///
    /// A file held open elsewhere produces a permission error; that is
    /// logged and skipped, never fatal.
    fn delete_zero_byte_csvs(&self) -> Result<(), OrganizerError> {
        debug!("Checking for and deleting zero-byte files");

        let csv_files = collect_files(self.download_folder(), &["Archive"], &|name| {
            name.ends_with(".csv")
        })?;

        for file in csv_files {
            let metadata = fs::metadata(&file).map_err(|e| {
                OrganizerError::Io(format!("failed to stat {}: {e}", file.display()))
            })?;

            if metadata.len() != 0 {
                continue;
            }

            match fs::remove_file(&file) {
                Ok(()) => debug!(file = %file.display(), "Deleted zero-byte file"),
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    warn!(
                        file = %file.display(),
                        "The 0 byte file could not be removed due to already being open, please close it and try again"
                    );
                }
                Err(e) => {
                    return Err(OrganizerError::Io(format!(
                        "failed to remove {}: {e}",
                        file.display()
                    )));
                }
            }
        }

        Ok(())
    }
}
