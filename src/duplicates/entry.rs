//! Entry data model for the duplicate index.
//!
//! An [`Entry`] describes one non-empty regular file. Entries live in an
//! [`EntryPool`](super::EntryPool) and are addressed by [`EntryId`] handles;
//! the bucket chains of the [`DuplicateIndex`](super::DuplicateIndex) link
//! entries through their `next` handle rather than through pointers.

use std::fmt;
use std::path::PathBuf;

use crate::scanner::Digest;

/// Stable handle to an entry slot in an [`EntryPool`](super::EntryPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    /// Handle for slot `index`, or `None` if it does not fit in 32 bits.
    pub(crate) fn try_new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Position of the slot inside its pool.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// In-memory record of one scanned regular file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Content digest, computed lazily on the first size collision
    pub digest: Option<Digest>,
    /// Device id, kept for hard-link detection
    pub device: u64,
    /// Inode number, kept for hard-link detection
    pub inode: u64,
    /// Hard-link count, kept for hard-link detection
    pub link_count: u64,
    /// Next entry in the owning bucket chain
    pub next: Option<EntryId>,
}

impl Entry {
    /// A zero-initialised entry owning `path`.
    #[must_use]
    pub fn blank(path: PathBuf) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    /// Whether the digest has already been computed.
    #[must_use]
    pub fn has_digest(&self) -> bool {
        self.digest.is_some()
    }

    /// Reset to the released state, dropping owned data.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
