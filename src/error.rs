//! Exit codes and top-level error reporting.

use crate::duplicates::FinderError;
use crate::scanner::ScanError;

/// Exit codes for the dupscan application.
///
/// - 0: Success (scan completed, whether or not duplicates were found)
/// - 1: Runtime or I/O error (traversal, digest, allocation, unsupported file type)
/// - 2: Usage error (wrong argument count or unknown flag)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed.
    Success = 0,
    /// Runtime or I/O failure.
    GeneralError = 1,
    /// Invalid command line.
    UsageError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::UsageError => "DS002",
        }
    }
}

/// Short category name for an error, used in the stderr message.
///
/// Falls back to `"error"` for failures outside the scan engine, such as
/// configuration problems.
#[must_use]
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<FinderError>() {
        Some(FinderError::AllocationFailure(_) | FinderError::EntryLimit(_)) => {
            "allocation failure"
        }
        Some(FinderError::Scan(ScanError::UnsupportedFileType(_))) => "unsupported file type",
        Some(_) => "I/O failure",
        None => "error",
    }
}
