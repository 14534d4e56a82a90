//! Duplicate detection module.
//!
//! This module provides the duplicate-detection engine:
//! - [`entry`]: The per-file [`Entry`] record and its [`EntryId`] handle
//! - [`pool`]: The [`EntryPool`] allocator that recycles released entries
//! - [`index`]: The size-bucketed [`DuplicateIndex`] with lazy digests
//! - [`finder`]: The [`DuplicateFinder`] that feeds walked files through the index

pub mod entry;
pub mod finder;
pub mod index;
pub mod pool;

use std::collections::TryReserveError;

pub use entry::{Entry, EntryId};
pub use finder::{DuplicateFinder, DuplicateReport, FinderConfig, ScanSummary};
pub use index::{Chain, DuplicateIndex, DEFAULT_BUCKETS, MAX_BUCKETS};
pub use pool::{EntryPool, MAX_ENTRIES};

/// Errors that abort a duplicate scan.
///
/// None of these are recovered; reports already emitted stay valid.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The entry arena could not grow.
    #[error("Out of memory allocating entry: {0}")]
    AllocationFailure(#[source] TryReserveError),

    /// Every entry handle is in use.
    #[error("Entry limit of {0} reached")]
    EntryLimit(usize),

    /// Traversal failed or hit an unsupported file type.
    #[error(transparent)]
    Scan(#[from] crate::scanner::ScanError),

    /// A content digest could not be computed.
    #[error(transparent)]
    Digest(#[from] crate::scanner::HashError),

    /// A duplicate report could not be written.
    #[error("Failed to write report: {0}")]
    Output(#[source] std::io::Error),
}
