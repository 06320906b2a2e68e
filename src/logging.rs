//! Diagnostics go through the `log` facade to stderr, so stdout carries only
//! the report.
//!
//! `RUST_LOG` wins when set. Otherwise warnings are shown, or only errors
//! when the report itself is suppressed.

use env_logger::{Builder, Env};
use log::LevelFilter;

pub fn init_logging(quiet: bool) {
    let default_level = if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    Builder::from_env(Env::default().default_filter_or(default_level.as_str()))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
