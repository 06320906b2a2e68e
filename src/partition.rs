use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use jwalk::WalkDir;

use crate::error::DedupError;
use crate::scanner::ScanFilter;

/// How far below the root folder scopes are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Depth {
    /// The root plus each of its immediate subdirectories
    #[default]
    Shallow,
    /// Every directory in the tree
    Recursive,
}

/// Folder scopes to scan, in reporting order
#[derive(Debug, Default)]
pub struct Partition {
    pub folders: Vec<PathBuf>,
    pub errors: Vec<DedupError>,
}

/// Split the tree under `root` into independent folder scopes.
///
/// The root always comes first. If the root itself cannot be listed, that is
/// left for the folder scan to report.
pub fn partition(root: &Path, depth: Depth, filter: &ScanFilter) -> Partition {
    match depth {
        Depth::Shallow => shallow(root, filter),
        Depth::Recursive => recursive(root, filter),
    }
}

fn shallow(root: &Path, filter: &ScanFilter) -> Partition {
    let mut partition = Partition {
        folders: vec![root.to_path_buf()],
        errors: Vec::new(),
    };

    let Ok(read_dir) = fs::read_dir(root) else {
        return partition;
    };

    let mut subdirs = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                partition.errors.push(DedupError::UnreadableFolder {
                    path: root.to_path_buf(),
                    source,
                });
                continue;
            }
        };

        // Symlinked directories are not followed
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        let path = entry.path();
        if is_dir && !filter.is_excluded(&path) {
            subdirs.push(path);
        }
    }

    subdirs.sort();
    partition.folders.extend(subdirs);
    partition
}

fn recursive(root: &Path, filter: &ScanFilter) -> Partition {
    let mut partition = Partition::default();
    let excludes = filter.clone();

    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false) // Don't follow symlinks to avoid infinite loops
        .sort(true)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|child| match child {
                Ok(entry) => entry.file_type().is_dir() && !excludes.is_excluded(&entry.path()),
                Err(_) => true,
            });
        });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => partition.folders.push(entry.path()),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                if path == root {
                    continue;
                }
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory loop detected"));
                partition
                    .errors
                    .push(DedupError::UnreadableFolder { path, source });
            }
        }
    }

    if partition.folders.first().map(PathBuf::as_path) != Some(root) {
        partition.folders.insert(0, root.to_path_buf());
    }

    partition
}
