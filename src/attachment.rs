//! Picks the file to stage for each contact.

use crate::config::FILE_COLUMN;
use crate::contacts::Record;
use std::path::{Path, PathBuf};

/// Resolves the attachment path for `record`.
///
/// A shared `override_path` wins for every contact. Otherwise the record's
/// file column is joined onto `files_dir`; a blank cell means the contact
/// only gets the message.
pub fn resolve(override_path: Option<&Path>, files_dir: &Path, record: &Record) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }
    record
        .non_empty(FILE_COLUMN)
        .map(|filename| files_dir.join(filename))
}
