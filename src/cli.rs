//! Command-line interface definitions for dupscan.
//!
//! This module defines all CLI arguments using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under a directory
//! dupscan ~/Downloads
//!
//! # Dry run with per-file diagnostics
//! dupscan -n -v ~/Downloads
//!
//! # Hash with an external command instead of in-process SHA-256
//! dupscan --digest command --hash-command "sha256sum" ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::scanner::DigestAlgorithm;

/// Find duplicate files under a directory tree.
///
/// Files are compared by size first; only files of equal size are hashed,
/// and equal digests are reported as duplicates of the first file seen.
#[derive(Debug, Parser)]
#[command(name = "dupscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dry run: report only (nothing is ever modified)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Digest algorithm used to confirm same-size files
    #[arg(long, value_enum, value_name = "ALG")]
    pub digest: Option<DigestAlgorithm>,

    /// External hashing command for `--digest command` (e.g. "sha256sum")
    #[arg(long, value_name = "CMD")]
    pub hash_command: Option<String>,

    /// Number of size buckets in the duplicate index
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..=crate::duplicates::MAX_BUCKETS as u64)
    )]
    pub buckets: Option<u64>,

    /// Output format for duplicate reports
    #[arg(short, long, value_enum, value_name = "FMT")]
    pub output: Option<OutputFormat>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH", env = "DUPSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to scan
    #[arg(value_name = "DIR")]
    pub path: PathBuf,
}
