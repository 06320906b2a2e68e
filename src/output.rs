use std::collections::HashSet;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::actions::DeletionOutcome;
use crate::error::DedupError;
use crate::executor::FolderOutcome;
use crate::grouping::DeletionPlan;
use crate::util::{format_bytes, format_number};

/// All folder results merged into one plan
#[derive(Debug, Default)]
pub struct Aggregate {
    pub plan: DeletionPlan,
    pub errors: Vec<DedupError>,
    pub folders_scanned: usize,
    pub files_scanned: usize,
}

/// Merge per-folder outcomes in the order given.
///
/// Plans are concatenated folder by folder; totals are plain sums and do not
/// depend on which folder finished first.
pub fn aggregate(outcomes: Vec<FolderOutcome>) -> Aggregate {
    let mut total = Aggregate::default();

    for outcome in outcomes {
        if !outcome.plan.is_empty() {
            log::debug!(
                "{}: {} duplicates",
                outcome.folder.display(),
                outcome.plan.len()
            );
        }
        total.folders_scanned += 1;
        total.files_scanned += outcome.files_scanned;
        total.plan.append(outcome.plan);
        total.errors.extend(outcome.errors);
    }

    total
}

/// Summary numbers of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub folders_scanned: usize,
    pub files_scanned: usize,
    /// Files in the deletion plan
    pub duplicate_files: usize,
    /// Size of every planned deletion
    pub reclaimable_bytes: u64,
    pub deleted_files: usize,
    /// Size of the files confirmed deleted
    pub freed_bytes: u64,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletionRecord {
    pub path: PathBuf,
    pub size: u64,
    pub kept: PathBuf,
    /// Hex BLAKE3 digest shared by the file and its kept copy
    pub digest: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub kind: &'static str,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl From<&DedupError> for ErrorRecord {
    fn from(err: &DedupError) -> Self {
        Self {
            kind: err.kind(),
            path: err.path().map(PathBuf::from),
            message: err.to_string(),
        }
    }
}

/// Complete report of a run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub dry_run: bool,
    pub stats: RunStats,
    pub deletions: Vec<DeletionRecord>,
    pub errors: Vec<ErrorRecord>,
}

impl Report {
    /// Build the report. `deletion` is `None` for a dry run.
    pub fn new(aggregate: &Aggregate, deletion: Option<&DeletionOutcome>) -> Self {
        let deleted: HashSet<&PathBuf> = deletion
            .map(|d| d.deleted.iter().collect())
            .unwrap_or_default();

        let deletions = aggregate
            .plan
            .entries
            .iter()
            .map(|d| DeletionRecord {
                path: d.path.clone(),
                size: d.size,
                kept: d.kept.clone(),
                digest: d.digest.to_hex().to_string(),
                deleted: deleted.contains(&d.path),
            })
            .collect();

        let errors: Vec<ErrorRecord> = aggregate
            .errors
            .iter()
            .chain(deletion.into_iter().flat_map(|d| d.errors.iter()))
            .map(ErrorRecord::from)
            .collect();

        let stats = RunStats {
            folders_scanned: aggregate.folders_scanned,
            files_scanned: aggregate.files_scanned,
            duplicate_files: aggregate.plan.len(),
            reclaimable_bytes: aggregate.plan.total_bytes,
            deleted_files: deletion.map_or(0, |d| d.deleted.len()),
            freed_bytes: deletion.map_or(0, |d| d.bytes_freed),
            errors: errors.len(),
        };

        Self {
            dry_run: deletion.is_none(),
            stats,
            deletions,
            errors,
        }
    }

    /// Output as human-readable colored text
    pub fn print_human(&self, verbose: bool) {
        println!(
            "Scanned {} files in {} folders",
            format_number(self.stats.files_scanned).cyan(),
            format_number(self.stats.folders_scanned).cyan()
        );

        if self.dry_run {
            self.print_dry_run(verbose);
        } else {
            self.print_deleted(verbose);
        }

        if !self.errors.is_empty() {
            println!(
                "{}",
                format!(
                    "{} errors encountered (details logged to stderr)",
                    format_number(self.errors.len())
                )
                .red()
            );
        }
    }

    fn print_dry_run(&self, verbose: bool) {
        if self.deletions.is_empty() {
            println!("\n{}", "No duplicates found.".green());
            return;
        }

        println!("\n{}", "Dry Run: Files that would be deleted:".bold());
        for record in &self.deletions {
            if verbose {
                println!(
                    "  {} {}",
                    record.path.display(),
                    format!("(duplicate of {})", record.kept.display()).dimmed()
                );
            } else {
                println!("  {}", record.path.display());
            }
        }

        println!(
            "\nTotal files: {}",
            format_number(self.stats.duplicate_files).cyan()
        );
        println!(
            "Total size: {}",
            format_bytes(self.stats.reclaimable_bytes).yellow()
        );
    }

    fn print_deleted(&self, verbose: bool) {
        if verbose {
            for record in self.deletions.iter().filter(|r| r.deleted) {
                println!(
                    "{} {} -> {}",
                    "[deleted]".green(),
                    record.path.display(),
                    record.kept.display()
                );
            }
        }

        println!(
            "Deleted {} files, freeing up {}.",
            format_number(self.stats.deleted_files),
            format_bytes(self.stats.freed_bytes)
        );
    }

    /// Output as JSON
    pub fn print_json(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
    }
}
