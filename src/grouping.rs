use std::collections::HashMap;
use std::path::PathBuf;

use crate::hasher::Digest;
use crate::scanner::FileEntry;

/// A file scheduled for removal, with the copy that stays in its place
#[derive(Debug, Clone)]
pub struct PlannedDeletion {
    pub path: PathBuf,
    pub size: u64,
    /// Survivor of the duplicate group this file belongs to
    pub kept: PathBuf,
    pub digest: Digest,
}

/// Ordered list of files to delete and the bytes they occupy
#[derive(Debug, Clone, Default)]
pub struct DeletionPlan {
    pub entries: Vec<PlannedDeletion>,
    pub total_bytes: u64,
}

impl DeletionPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another plan, keeping its order after ours.
    pub fn append(&mut self, other: DeletionPlan) {
        self.total_bytes += other.total_bytes;
        self.entries.extend(other.entries);
    }
}

/// Per-folder bookkeeping of survivors and superseded duplicates.
///
/// For every digest observed so far exactly one entry is the survivor, and it
/// has the smallest creation time among the entries seen for that digest.
/// On equal timestamps a regular file beats a symlink, so a link never
/// outlives the file it points to; otherwise the first observed entry stays.
#[derive(Debug, Default)]
pub struct FolderGroup {
    survivors: HashMap<Digest, FileEntry>,
    superseded: Vec<(Digest, FileEntry)>,
    superseded_bytes: u64,
}

impl FolderGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one fingerprinted file.
    pub fn observe(&mut self, entry: FileEntry, digest: Digest) {
        let Some(survivor) = self.survivors.get_mut(&digest) else {
            self.survivors.insert(digest, entry);
            return;
        };

        let newcomer_first =
            (entry.created, entry.is_symlink) < (survivor.created, survivor.is_symlink);
        let loser = if newcomer_first {
            std::mem::replace(survivor, entry)
        } else {
            entry
        };

        self.superseded_bytes += loser.size;
        self.superseded.push((digest, loser));
    }

    /// Emit the deletion plan, resolving each candidate's kept file to the
    /// final survivor of its group.
    pub fn into_plan(self) -> DeletionPlan {
        let entries = self
            .superseded
            .into_iter()
            .map(|(digest, entry)| PlannedDeletion {
                kept: self.survivors[&digest].path.clone(),
                path: entry.path,
                size: entry.size,
                digest,
            })
            .collect();

        DeletionPlan {
            entries,
            total_bytes: self.superseded_bytes,
        }
    }
}
