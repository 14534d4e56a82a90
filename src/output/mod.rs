//! Output formatters for duplicate reports.
//!
//! Reports are written one line at a time, as soon as they are detected:
//! - Text: `>>> DUP file: <duplicate>. Original: <original>.`
//! - JSON: one object per line, for automation and scripting
//!
//! # Example
//!
//! ```
//! use dupscan::duplicates::DuplicateReport;
//! use dupscan::output::{OutputFormat, ReportWriter};
//! use std::path::PathBuf;
//!
//! let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text);
//! writer
//!     .write_report(&DuplicateReport {
//!         duplicate: PathBuf::from("b"),
//!         original: PathBuf::from("a"),
//!         size: 10,
//!     })
//!     .unwrap();
//!
//! let text = String::from_utf8(writer.into_inner()).unwrap();
//! assert_eq!(text, ">>> DUP file: b. Original: a.\n");
//! ```

use std::fmt;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::duplicates::DuplicateReport;

/// Output format for duplicate reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report lines
    #[default]
    Text,
    /// JSON lines for scripting
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Line-oriented writer for duplicate reports.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    /// Wrap `out` in a writer for `format`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Write one report line and flush it.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn write_report(&mut self, report: &DuplicateReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{report}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, report)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
