mod actions;
mod error;
mod executor;
mod grouping;
mod hasher;
mod logging;
mod output;
mod partition;
mod scanner;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::DedupError;
use crate::executor::Schedule;
use crate::output::Report;
use crate::partition::Depth;
use crate::scanner::ScanFilter;

#[derive(Parser, Debug)]
#[command(name = "folder-dedup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to clean up
    path: PathBuf,

    /// List the files that would be deleted without deleting them
    #[arg(long)]
    dry_run: bool,

    /// Which directories become comparison scopes
    #[arg(short, long, value_enum, default_value_t = Depth::Shallow)]
    depth: Depth,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long, conflicts_with = "sequential")]
    jobs: Option<usize>,

    /// Scan one folder at a time
    #[arg(long)]
    sequential: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Show which copy is kept for every deleted file
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Minimum file size in bytes to consider (smaller files are skipped)
    #[arg(short = 's', long)]
    min_size: Option<u64>,

    /// Glob for file or directory names to skip (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    excludes: Vec<String>,

    /// File with exclude globs, one per line ('#' starts a comment)
    #[arg(long, value_name = "FILE")]
    exclude_file: Option<PathBuf>,

    /// Scan symlinks that point to regular files instead of skipping them
    #[arg(long)]
    follow_symlinks: bool,

    /// Exit with status 1 if any file or folder could not be processed
    #[arg(long)]
    strict: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
    /// No output, only the exit code
    Quiet,
}

impl Cli {
    fn schedule(&self) -> Schedule {
        if self.sequential {
            Schedule::Sequential
        } else {
            Schedule::Parallel { jobs: self.jobs }
        }
    }

    fn progress_bar(&self, folders: usize) -> ProgressBar {
        if self.no_progress || self.format != OutputFormat::Human {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(folders as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} folders") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

fn build_filter(cli: &Cli) -> Result<ScanFilter, DedupError> {
    let mut patterns = cli.excludes.clone();
    if let Some(path) = &cli.exclude_file {
        patterns.extend(ScanFilter::read_exclude_file(path)?);
    }

    ScanFilter {
        min_size: cli.min_size,
        follow_symlinks: cli.follow_symlinks,
        ..ScanFilter::default()
    }
    .with_excludes(&patterns)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.format == OutputFormat::Quiet);

    let filter = match build_filter(&cli) {
        Ok(filter) => filter,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(2);
        }
    };

    // Stage 1: Decide which folders are compared on their own
    let partition = partition::partition(&cli.path, cli.depth, &filter);
    for e in &partition.errors {
        log::warn!("{e}");
    }
    log::info!(
        "{} folders to scan under {}",
        partition.folders.len(),
        cli.path.display()
    );

    // Stage 2: Fingerprint and group each folder independently
    let progress = cli.progress_bar(partition.folders.len());
    let outcomes = executor::execute(
        &partition.folders,
        cli.schedule(),
        |folder| scanner::scan_folder(folder, &filter),
        &progress,
    );
    progress.finish_and_clear();

    // Stage 3: Merge and act on the combined plan
    let mut aggregate = output::aggregate(outcomes);
    let mut errors = partition.errors;
    errors.append(&mut aggregate.errors);
    aggregate.errors = errors;

    let deletion = (!cli.dry_run).then(|| actions::delete_planned(&aggregate.plan));
    let report = Report::new(&aggregate, deletion.as_ref());
    log::info!(
        "{} duplicates planned, {} deleted",
        report.stats.duplicate_files,
        report.stats.deleted_files
    );

    match cli.format {
        OutputFormat::Human => report.print_human(cli.verbose),
        OutputFormat::Json => report.print_json(),
        OutputFormat::Quiet => {}
    }

    if cli.strict && !report.errors.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
