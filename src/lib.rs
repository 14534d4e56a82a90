//! dupscan - size-first, content-second duplicate file scanner
//!
//! Walks a directory tree and reports every regular file whose content
//! matches a file seen earlier in the walk. Sizes are compared first; a
//! content digest is computed only for files whose size collides with a
//! retained file, and at most once per file.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Settings;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::ReportWriter;

/// Run a scan for a parsed command line, writing reports to stdout.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or the scan hits a
/// fatal error. Reports written before the failure stay on stdout.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let settings = Settings::load(&cli)?;
    let stdout = io::stdout();
    run_scan(&cli, &settings, stdout.lock())
}

/// Scan `cli.path` with resolved settings, writing reports to `out`.
///
/// # Errors
///
/// Returns the fatal scan error, with context naming the scan root.
pub fn run_scan<W: io::Write>(cli: &Cli, settings: &Settings, out: W) -> Result<ExitCode> {
    let digester = settings.digest.provider(settings.hash_command.as_deref());
    let config = FinderConfig::default()
        .with_buckets(settings.buckets)
        .with_dry_run(cli.dry_run);
    log::debug!(
        "Digest: {}, buckets: {}, dry run: {}",
        settings.digest,
        config.buckets,
        config.dry_run
    );

    let mut writer = ReportWriter::new(out, settings.output);
    let mut finder = DuplicateFinder::new(digester, config);
    finder
        .scan(&cli.path, |report| writer.write_report(report))
        .with_context(|| format!("Scan of {} failed", cli.path.display()))?;

    Ok(ExitCode::Success)
}
