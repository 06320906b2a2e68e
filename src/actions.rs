use std::fs;
use std::path::PathBuf;

use crate::error::DedupError;
use crate::grouping::DeletionPlan;

/// Result of carrying out a deletion plan
#[derive(Debug, Default)]
pub struct DeletionOutcome {
    /// Files actually removed, in plan order
    pub deleted: Vec<PathBuf>,
    /// Bytes of the files actually removed
    pub bytes_freed: u64,
    /// Deletions that failed
    pub errors: Vec<DedupError>,
}

/// Remove every file in the plan.
///
/// A failed removal (already gone, permission denied) is recorded and the
/// remaining files are still processed. Only confirmed removals count
/// towards `bytes_freed`.
pub fn delete_planned(plan: &DeletionPlan) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();

    for deletion in &plan.entries {
        match fs::remove_file(&deletion.path) {
            Ok(()) => {
                log::debug!("deleted {}", deletion.path.display());
                outcome.deleted.push(deletion.path.clone());
                outcome.bytes_freed += deletion.size;
            }
            Err(source) => {
                let err = DedupError::DeletionFailure {
                    path: deletion.path.clone(),
                    source,
                };
                log::warn!("{err}");
                outcome.errors.push(err);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::PlannedDeletion;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn planned(path: &Path, kept: &Path, size: u64) -> PlannedDeletion {
        PlannedDeletion {
            path: path.to_path_buf(),
            size,
            kept: kept.to_path_buf(),
            digest: blake3::hash(b"irrelevant"),
        }
    }

    #[test]
    fn test_deletes_planned_files_only() {
        let temp = TempDir::new().unwrap();
        let content = b"duplicate content";

        let keep = create_file(temp.path(), "a.txt", content);
        let dup = create_file(temp.path(), "b.txt", content);

        let plan = DeletionPlan {
            entries: vec![planned(&dup, &keep, content.len() as u64)],
            total_bytes: content.len() as u64,
        };

        let outcome = delete_planned(&plan);

        assert_eq!(outcome.deleted, vec![dup.clone()]);
        assert_eq!(outcome.bytes_freed, content.len() as u64);
        assert!(outcome.errors.is_empty());
        assert!(keep.exists());
        assert!(!dup.exists());
    }

    #[test]
    fn test_missing_file_does_not_stop_others() {
        let temp = TempDir::new().unwrap();

        let keep = create_file(temp.path(), "keep.txt", b"x");
        let gone = temp.path().join("gone.txt");
        let dup = create_file(temp.path(), "dup.txt", b"x");

        let plan = DeletionPlan {
            entries: vec![planned(&gone, &keep, 1), planned(&dup, &keep, 1)],
            total_bytes: 2,
        };

        let outcome = delete_planned(&plan);

        assert_eq!(outcome.deleted, vec![dup.clone()]);
        assert_eq!(outcome.bytes_freed, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0],
            DedupError::DeletionFailure { .. }
        ));
        assert!(!dup.exists());
    }

    #[test]
    fn test_empty_plan() {
        let outcome = delete_planned(&DeletionPlan::default());

        assert!(outcome.deleted.is_empty());
        assert_eq!(outcome.bytes_freed, 0);
        assert!(outcome.errors.is_empty());
    }
}
