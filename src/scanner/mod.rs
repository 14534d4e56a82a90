//! Scanner module for directory traversal and content digests.
//!
//! This module provides the two collaborators the duplicate engine is fed by:
//! - Sequential, deterministic directory walking using walkdir
//! - Content digests (SHA-256, BLAKE3, or an external hashing command)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file-type classification
//! - [`hasher`]: The [`DigestProvider`] interface and its implementations
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkEvent};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."));
//! for event in walker.walk() {
//!     match event {
//!         Ok(WalkEvent::File(file)) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Ok(_) => {}
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fs::Metadata;
use std::path::PathBuf;

// Re-export main types
pub use hasher::{
    Blake3Hasher, CommandHasher, Digest, DigestAlgorithm, DigestProvider, Sha256Hasher,
};
pub use walker::{WalkEvent, Walker};

/// Metadata for a discovered regular file.
///
/// Device, inode and link count are carried along for hard-link detection
/// but play no part in duplicate matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file, as produced by the traversal
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Device id of the containing filesystem
    pub device: u64,
    /// Inode number
    pub inode: u64,
    /// Number of hard links
    pub link_count: u64,
}

impl FileRecord {
    /// Create a record with only a path and size; link metadata is zeroed.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            device: 0,
            inode: 0,
            link_count: 0,
        }
    }

    /// Build a record from `lstat`-style metadata.
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let (device, inode, link_count) = link_info(metadata);
        Self {
            path,
            size: metadata.len(),
            device,
            inode,
            link_count,
        }
    }
}

#[cfg(unix)]
fn link_info(metadata: &Metadata) -> (u64, u64, u64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.dev(), metadata.ino(), metadata.nlink())
}

#[cfg(not(unix))]
fn link_info(_metadata: &Metadata) -> (u64, u64, u64) {
    (0, 0, 0)
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A node that is neither a regular file, a directory, nor a symlink.
    #[error("Can't handle file type for {0}")]
    UnsupportedFileType(PathBuf),

    /// An I/O error occurred while reading a directory or its entries.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while computing a content digest.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The external hashing command could not be run or reported failure.
    #[error("Hash command '{command}' failed for {path}: {detail}")]
    Command {
        /// Program that was invoked
        command: String,
        /// File being hashed
        path: PathBuf,
        /// Exit status or spawn error
        detail: String,
    },

    /// The hashing command produced output that is not a hex digest.
    #[error("Unexpected hash output for {path}: '{output}'")]
    MalformedOutput {
        /// File being hashed
        path: PathBuf,
        /// First line of the command output
        output: String,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
