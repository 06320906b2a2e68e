use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::DedupError;
use crate::grouping::DeletionPlan;
use crate::scanner::FolderScan;

/// How folder scans are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// One folder at a time, in partition order
    Sequential,
    /// A dedicated pool of workers; `None` sizes it to the available CPUs
    Parallel { jobs: Option<usize> },
}

/// What one folder contributed to the run
#[derive(Debug)]
pub struct FolderOutcome {
    pub folder: PathBuf,
    pub plan: DeletionPlan,
    pub errors: Vec<DedupError>,
    pub files_scanned: usize,
}

impl FolderOutcome {
    fn new(folder: &Path, result: Result<FolderScan, DedupError>) -> Self {
        match result {
            Ok(scan) => Self {
                folder: folder.to_path_buf(),
                plan: scan.plan,
                errors: scan.errors,
                files_scanned: scan.files_scanned,
            },
            // The folder contributes nothing but its error
            Err(e) => Self {
                folder: folder.to_path_buf(),
                plan: DeletionPlan::default(),
                errors: vec![e],
                files_scanned: 0,
            },
        }
    }
}

/// Run `scan` once per folder and collect the outcomes in `folders` order.
///
/// Each invocation owns all of its state, so the parallel schedule needs no
/// locking. Completion order does not affect the result order.
pub fn execute<F>(
    folders: &[PathBuf],
    schedule: Schedule,
    scan: F,
    progress: &ProgressBar,
) -> Vec<FolderOutcome>
where
    F: Fn(&Path) -> Result<FolderScan, DedupError> + Sync,
{
    let run_one = |folder: &PathBuf| {
        log::debug!("scanning {}", folder.display());
        let outcome = FolderOutcome::new(folder, scan(folder.as_path()));
        for e in &outcome.errors {
            log::warn!("{e}");
        }
        progress.inc(1);
        outcome
    };

    match schedule {
        Schedule::Sequential => folders.iter().map(run_one).collect(),
        Schedule::Parallel { jobs } => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs.unwrap_or(0))
                .build();

            match pool {
                Ok(pool) => pool.install(|| folders.par_iter().map(run_one).collect()),
                Err(e) => {
                    log::warn!("could not start worker pool ({e}), scanning sequentially");
                    folders.iter().map(run_one).collect()
                }
            }
        }
    }
}
