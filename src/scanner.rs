use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::DedupError;
use crate::grouping::{DeletionPlan, FolderGroup};
use crate::hasher;

/// Information about a file found during scanning
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub created: SystemTime,
    /// Reached through a followed symlink. Its timestamps are the target's.
    pub is_symlink: bool,
}

impl FileEntry {
    fn from_metadata(path: PathBuf, metadata: &Metadata, is_symlink: bool) -> io::Result<Self> {
        // Not every filesystem records birth time
        let created = metadata.created().or_else(|_| metadata.modified())?;

        Ok(Self {
            path,
            size: metadata.len(),
            created,
            is_symlink,
        })
    }
}

/// Which entries take part in a scan
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    /// Files smaller than this are skipped
    pub min_size: Option<u64>,
    /// File and directory names to skip
    pub excludes: GlobSet,
    /// Scan symlinks that resolve to regular files instead of reporting them
    pub follow_symlinks: bool,
}

impl ScanFilter {
    /// Compile exclude patterns. Each pattern is matched against a bare file
    /// or directory name.
    pub fn with_excludes(mut self, patterns: &[String]) -> Result<Self, DedupError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| DedupError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }

        self.excludes = builder.build().map_err(|source| DedupError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(self)
    }

    /// Read exclude patterns from a file, one per line. Blank lines and
    /// lines starting with `#` are ignored.
    pub fn read_exclude_file(path: &Path) -> Result<Vec<String>, DedupError> {
        let contents = fs::read_to_string(path).map_err(|source| DedupError::ExcludeFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect())
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.excludes.is_match(name))
    }

    fn is_too_small(&self, size: u64) -> bool {
        size < self.min_size.unwrap_or(0)
    }
}

/// Files found directly inside one folder, plus the entries that could not
/// be used
#[derive(Debug, Default)]
pub struct FolderListing {
    pub files: Vec<FileEntry>,
    pub errors: Vec<DedupError>,
}

/// Result of scanning a single folder scope
#[derive(Debug, Default)]
pub struct FolderScan {
    pub plan: DeletionPlan,
    pub errors: Vec<DedupError>,
    pub files_scanned: usize,
}

/// List the regular files directly inside `folder`, sorted by name.
///
/// Subdirectories are skipped silently. Symlinks (unless followed), sockets,
/// fifos and devices are reported as `NotRegularFile`.
pub fn list_folder(folder: &Path, filter: &ScanFilter) -> Result<FolderListing, DedupError> {
    let read_dir = fs::read_dir(folder).map_err(|source| DedupError::UnreadableFolder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut listing = FolderListing::default();
    let mut paths = Vec::new();

    for entry in read_dir {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(source) => listing.errors.push(DedupError::UnreadableFolder {
                path: folder.to_path_buf(),
                source,
            }),
        }
    }

    // Equal creation times fall back to name order
    paths.sort();

    for path in paths {
        if filter.is_excluded(&path) {
            continue;
        }

        match inspect_entry(&path, filter) {
            Ok(Some(entry)) if !filter.is_too_small(entry.size) => listing.files.push(entry),
            Ok(_) => {}
            Err(e) => listing.errors.push(e),
        }
    }

    Ok(listing)
}

/// Stat one directory entry. `Ok(None)` means "not a file, nothing to report".
fn inspect_entry(path: &Path, filter: &ScanFilter) -> Result<Option<FileEntry>, DedupError> {
    let unreadable = |source: io::Error| DedupError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    };

    let mut metadata = fs::symlink_metadata(path).map_err(unreadable)?;
    let is_symlink = metadata.file_type().is_symlink();

    if is_symlink {
        if !filter.follow_symlinks {
            return Err(DedupError::NotRegularFile {
                path: path.to_path_buf(),
            });
        }
        metadata = fs::metadata(path).map_err(unreadable)?;
    }

    if metadata.is_dir() {
        return Ok(None);
    }

    if !metadata.is_file() {
        return Err(DedupError::NotRegularFile {
            path: path.to_path_buf(),
        });
    }

    FileEntry::from_metadata(path.to_path_buf(), &metadata, is_symlink)
        .map(Some)
        .map_err(unreadable)
}

/// Scan one folder scope: fingerprint its files and decide which
/// duplicates go.
pub fn scan_folder(folder: &Path, filter: &ScanFilter) -> Result<FolderScan, DedupError> {
    list_folder(folder, filter).map(group_listing)
}

/// Fingerprint listed files and group them. A file that can no longer be
/// read is recorded and left out of every group.
fn group_listing(listing: FolderListing) -> FolderScan {
    let mut errors = listing.errors;
    let mut group = FolderGroup::new();
    let mut files_scanned = 0;

    for entry in listing.files {
        match hasher::fingerprint(&entry.path) {
            Ok(digest) => {
                files_scanned += 1;
                group.observe(entry, digest);
            }
            Err(e) => errors.push(e),
        }
    }

    FolderScan {
        plan: group.into_plan(),
        errors,
        files_scanned,
    }
}
