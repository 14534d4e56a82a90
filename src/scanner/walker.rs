//! Directory walker implementation using walkdir for sequential traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and classifying every node it meets. Traversal is single-threaded and
//! depth-first, with the children of each directory sorted by file name, so
//! two walks of an unchanged tree yield the same sequence of events.
//!
//! # Classification
//!
//! - Directories are reported and descended into
//! - Regular files are reported with their `lstat` metadata
//! - Symbolic links are reported but never followed
//! - Anything else (block/character devices, FIFOs, sockets) is an error
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkEvent};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! let files = walker
//!     .walk()
//!     .filter_map(Result::ok)
//!     .filter(|event| matches!(event, WalkEvent::File(_)))
//!     .count();
//! println!("Found {} files", files);
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError};

/// One classified node of the directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A directory that is about to be descended into (includes the root).
    Directory(PathBuf),
    /// A regular file, of any size.
    File(FileRecord),
    /// A symbolic link, which is not followed.
    Symlink(PathBuf),
}

/// Sequential directory walker.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// The root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// [`ScanError::NotFound`], [`ScanError::NotADirectory`], or
    /// [`ScanError::Io`] if the root cannot be inspected.
    pub fn validate_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScanError::NotFound(self.root.clone()))
            }
            Err(e) => Err(ScanError::Io {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    /// Walk the directory tree, yielding classified events.
    ///
    /// Errors are yielded in place; callers that treat them as fatal simply
    /// stop iterating. The root is validated first and a failure is yielded
    /// as the only item.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkEvent, ScanError>> + '_ {
        let root_check = self.validate_root().err();
        let entries = if root_check.is_none() {
            Some(
                WalkDir::new(&self.root)
                    .follow_links(false)
                    .sort_by_file_name()
                    .into_iter(),
            )
        } else {
            None
        };

        root_check
            .map(Err)
            .into_iter()
            .chain(entries.into_iter().flatten().map(move |entry| match entry {
                Ok(entry) => Self::classify(entry),
                Err(e) => Err(self.convert_error(e)),
            }))
    }

    /// Turn a walkdir entry into a [`WalkEvent`].
    fn classify(entry: walkdir::DirEntry) -> Result<WalkEvent, ScanError> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return Ok(WalkEvent::Directory(entry.into_path()));
        }
        if file_type.is_symlink() {
            return Ok(WalkEvent::Symlink(entry.into_path()));
        }
        if !file_type.is_file() {
            return Err(ScanError::UnsupportedFileType(entry.into_path()));
        }

        // walkdir does not follow links here, so this is lstat metadata.
        let metadata = entry.metadata().map_err(|e| {
            let path = entry.path().to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
            ScanError::Io { path, source }
        })?;

        Ok(WalkEvent::File(FileRecord::from_metadata(
            entry.into_path(),
            &metadata,
        )))
    }

    /// Convert a walkdir error to a [`ScanError`].
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::debug!("Walker error for {}: {}", path.display(), error);
        let source = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("directory traversal failed"));
        ScanError::Io { path, source }
    }
}
