//! Duplicate finder: the scan orchestrator around the index.
//!
//! # Overview
//!
//! [`DuplicateFinder`] is the engine object for one scan. It owns the
//! [`EntryPool`], the [`DuplicateIndex`] and the digest provider, and feeds
//! every non-empty regular file from the [`Walker`] through
//! [`DuplicateIndex::lookup_or_insert`] in traversal order:
//!
//! 1. Zero-length files are skipped outright
//! 2. A fresh entry is taken from the pool and filled from the file metadata
//! 3. If the index reports an original, a [`DuplicateReport`] is emitted and
//!    the entry goes straight back to the pool
//! 4. Otherwise the index keeps the entry for the rest of the scan
//!
//! The first fatal error stops the scan. Reports already handed to the
//! caller remain valid.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateFinder, FinderConfig};
//! use dupscan::scanner::Sha256Hasher;
//! use std::path::Path;
//!
//! let mut finder = DuplicateFinder::new(Sha256Hasher::new(), FinderConfig::default());
//! let summary = finder
//!     .scan(Path::new("/some/path"), |report| {
//!         println!("{}", report);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! println!("{} duplicates", summary.duplicates);
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::index::{DuplicateIndex, DEFAULT_BUCKETS, MAX_BUCKETS};
use super::pool::EntryPool;
use super::FinderError;
use crate::scanner::{DigestProvider, FileRecord, WalkEvent, Walker};

/// Configuration for a duplicate scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Number of index buckets.
    pub buckets: usize,
    /// Report only. Nothing is modified either way; the flag is recorded
    /// so a future destructive mode can honour it.
    pub dry_run: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
            dry_run: false,
        }
    }
}

impl FinderConfig {
    /// Set the number of index buckets, clamped to `1..=MAX_BUCKETS`.
    #[must_use]
    pub fn with_buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets.clamp(1, MAX_BUCKETS);
        self
    }

    /// Set the dry-run flag.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A detected duplicate and the retained original it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    /// The later-encountered file
    pub duplicate: PathBuf,
    /// The earlier-encountered, retained file
    pub original: PathBuf,
    /// Size shared by both files, in bytes
    pub size: u64,
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ">>> DUP file: {}. Original: {}.",
            self.duplicate.display(),
            self.original.display()
        )
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Directories visited, including the root
    pub directories: usize,
    /// Regular files seen, including empty ones
    pub files: usize,
    /// Zero-length files skipped
    pub empty_files: usize,
    /// Symbolic links skipped
    pub symlinks: usize,
    /// Entries retained in the index
    pub retained: usize,
    /// Duplicates reported
    pub duplicates: usize,
    /// Total size of all reported duplicates in bytes
    pub duplicate_bytes: u64,
    /// Digests computed
    pub digests_computed: usize,
    /// Entry allocations served from released slots
    pub reused_slots: usize,
}

/// Engine object for one scan.
pub struct DuplicateFinder<D: DigestProvider> {
    config: FinderConfig,
    pool: EntryPool,
    index: DuplicateIndex,
    digester: D,
    summary: ScanSummary,
}

impl<D: DigestProvider> DuplicateFinder<D> {
    /// Create a finder with the given digest provider and configuration.
    #[must_use]
    pub fn new(digester: D, config: FinderConfig) -> Self {
        Self {
            index: DuplicateIndex::with_buckets(config.buckets),
            config,
            pool: EntryPool::new(),
            digester,
            summary: ScanSummary::default(),
        }
    }

    /// The duplicate index.
    #[must_use]
    pub fn index(&self) -> &DuplicateIndex {
        &self.index
    }

    /// The entry pool.
    #[must_use]
    pub fn pool(&self) -> &EntryPool {
        &self.pool
    }

    /// Statistics gathered so far.
    #[must_use]
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            retained: self.index.len(),
            digests_computed: self.index.digests_computed(),
            reused_slots: self.pool.reused(),
            ..self.summary.clone()
        }
    }

    /// Feed one regular file through the index.
    ///
    /// Returns the report if the file duplicates a retained one. Zero-length
    /// files are ignored and never indexed.
    ///
    /// # Errors
    ///
    /// [`FinderError::AllocationFailure`] or [`FinderError::Digest`].
    pub fn check_file(&mut self, file: FileRecord) -> Result<Option<DuplicateReport>, FinderError> {
        self.summary.files += 1;
        if file.size == 0 {
            log::debug!("Skipping empty file: {}", file.path.display());
            self.summary.empty_files += 1;
            return Ok(None);
        }

        log::debug!("Regular file: {}, size: {}", file.path.display(), file.size);

        let id = self.pool.allocate(file.path)?;
        {
            let entry = self.pool.get_mut(id);
            entry.size = file.size;
            entry.device = file.device;
            entry.inode = file.inode;
            entry.link_count = file.link_count;
        }

        let original = match self
            .index
            .lookup_or_insert(&mut self.pool, id, &mut self.digester)?
        {
            Some(original) => original,
            None => return Ok(None),
        };

        let report = DuplicateReport {
            duplicate: std::mem::take(&mut self.pool.get_mut(id).path),
            original: self.pool.get(original).path.clone(),
            size: file.size,
        };
        self.pool.release(id);

        self.summary.duplicates += 1;
        self.summary.duplicate_bytes += report.size;
        Ok(Some(report))
    }

    /// Scan a directory tree, calling `on_duplicate` for each detection as it
    /// happens.
    ///
    /// # Errors
    ///
    /// The first traversal, digest, allocation or reporting failure aborts
    /// the scan. The index keeps whatever was inserted up to that point.
    pub fn scan<F>(&mut self, root: &Path, mut on_duplicate: F) -> Result<ScanSummary, FinderError>
    where
        F: FnMut(&DuplicateReport) -> io::Result<()>,
    {
        log::info!("Starting duplicate scan of {}", root.display());
        if self.config.dry_run {
            log::info!("Dry run: no files will be modified");
        }

        let walker = Walker::new(root);
        for event in walker.walk() {
            match event? {
                WalkEvent::Directory(path) => {
                    log::debug!("Directory: {}", path.display());
                    self.summary.directories += 1;
                }
                WalkEvent::Symlink(path) => {
                    log::debug!("Ignoring a symlink ({})", path.display());
                    self.summary.symlinks += 1;
                }
                WalkEvent::File(file) => {
                    if let Some(report) = self.check_file(file)? {
                        on_duplicate(&report).map_err(FinderError::Output)?;
                    }
                }
            }
        }

        let summary = self.summary();
        log::info!(
            "Scan complete: {} files, {} duplicates, {} digests computed",
            summary.files,
            summary.duplicates,
            summary.digests_computed
        );
        Ok(summary)
    }
}

impl<D: DigestProvider> fmt::Debug for DuplicateFinder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .field("index", &self.index.len())
            .field("digester", &"<digester>")
            .field("summary", &self.summary)
            .finish()
    }
}
