use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong while scanning or deleting.
///
/// Only `ExcludeFile` and `InvalidPattern` stop a run. The other variants are recorded
/// against the file or folder they belong to and processing moves on.
#[derive(Debug, Error)]
pub enum DedupError {
    /// A file could not be opened, read or stat'ed
    #[error("failed to read {}: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Symlink or special file (socket, fifo, device)
    #[error("not a regular file: {}", .path.display())]
    NotRegularFile { path: PathBuf },

    /// A folder could not be listed
    #[error("failed to list folder {}: {source}", .path.display())]
    UnreadableFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A planned deletion did not happen
    #[error("failed to delete {}: {source}", .path.display())]
    DeletionFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read exclude file {}: {source}", .path.display())]
    ExcludeFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl DedupError {
    /// Stable name used in the JSON report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnreadableFile { .. } => "unreadable_file",
            Self::NotRegularFile { .. } => "not_regular_file",
            Self::UnreadableFolder { .. } => "unreadable_folder",
            Self::DeletionFailure { .. } => "deletion_failure",
            Self::ExcludeFile { .. } => "exclude_file",
            Self::InvalidPattern { .. } => "invalid_pattern",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::UnreadableFile { path, .. }
            | Self::NotRegularFile { path }
            | Self::UnreadableFolder { path, .. }
            | Self::DeletionFailure { path, .. }
            | Self::ExcludeFile { path, .. } => Some(path),
            Self::InvalidPattern { .. } => None,
        }
    }
}
