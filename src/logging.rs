//! Logging infrastructure for dupscan.
//!
//! Diagnostics use the `log` facade with an `env_logger` backend writing to
//! stderr. Duplicate reports never go through the logger; they are written
//! to stdout regardless of verbosity.
//!
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `-q` (errors only)
//! 3. `-v` debug: directories, per-file sizes, index lookups and matches
//! 4. `-vv` trace: computed digests
//! 5. Default: warn level (scan progress and per-file lines need `-v`)
//!
//! # Example
//!
//! ```rust,no_run
//! use dupscan::logging::init_logging;
//!
//! // Equivalent to `dupscan -v <dir>`
//! init_logging(1, false);
//! log::debug!("Regular file: ./a, size: 10");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem from the CLI verbosity flags.
///
/// Call once, before any logging happens.
///
/// # Panics
///
/// Panics if a global logger is already installed.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    let from_env = env::var_os("RUST_LOG").is_some();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 2 {
            writeln!(
                buf,
                "{style}{:<5}{style:#} [{}] {}",
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        }
    });

    builder.init();

    if !from_env {
        log::trace!("Logging initialized at level: {}", current_level_name());
    }
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Name of the current maximum log level.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
