//! Size-bucketed duplicate index with lazy content digests.
//!
//! # Overview
//!
//! The index is a fixed table of buckets selected by `size % buckets`. Each
//! bucket holds a singly linked chain of retained entries in non-decreasing
//! size order. Looking up a candidate walks its bucket only while the chain
//! sizes are `<=` the candidate size.
//!
//! Digests are computed lazily: only when a chain entry has exactly the
//! candidate's size are the two files hashed, each at most once for its
//! whole lifetime. A file whose size is unique in its bucket is never
//! hashed. Equal digests are treated as identical content.
//!
//! # Invariants
//!
//! - Adjacent chain entries satisfy `a.size <= b.size`
//! - No two chain entries of equal size have equal digests
//! - A computed digest is cached on its entry and never recomputed
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateIndex, EntryPool};
//! use dupscan::scanner::Sha256Hasher;
//! use std::path::PathBuf;
//!
//! let mut pool = EntryPool::new();
//! let mut index = DuplicateIndex::new();
//! let mut hasher = Sha256Hasher::new();
//!
//! let id = pool.allocate(PathBuf::from("/data/a.bin")).unwrap();
//! pool.get_mut(id).size = 10;
//! if let Some(original) = index.lookup_or_insert(&mut pool, id, &mut hasher).unwrap() {
//!     println!("duplicate of {}", pool.get(original).path.display());
//! }
//! ```

use super::entry::{Entry, EntryId};
use super::pool::EntryPool;
use super::FinderError;
use crate::scanner::DigestProvider;

/// Default bucket count. A prime keeps `size % N` well spread.
pub const DEFAULT_BUCKETS: usize = 1049;

/// Upper bound on the bucket count.
pub const MAX_BUCKETS: usize = 1 << 20;

/// Fixed-size table of size-ordered entry chains.
#[derive(Debug, Clone)]
pub struct DuplicateIndex {
    buckets: Vec<Option<EntryId>>,
    len: usize,
    digests_computed: usize,
}

impl Default for DuplicateIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicateIndex {
    /// Create an index with [`DEFAULT_BUCKETS`] buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create an index with `buckets` buckets, clamped to `1..=MAX_BUCKETS`.
    #[must_use]
    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets: vec![None; buckets.clamp(1, MAX_BUCKETS)],
            len: 0,
            digests_computed: 0,
        }
    }

    /// Number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket selected for a file of `size` bytes.
    #[must_use]
    pub fn bucket_of(&self, size: u64) -> usize {
        (size % self.buckets.len() as u64) as usize
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing has been retained yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of digests computed through this index.
    #[must_use]
    pub fn digests_computed(&self) -> usize {
        self.digests_computed
    }

    /// Iterate over the retained entries of one bucket, head first.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= self.bucket_count()`.
    pub fn chain<'a>(&self, pool: &'a EntryPool, bucket: usize) -> Chain<'a> {
        Chain {
            pool,
            cursor: self.buckets[bucket],
        }
    }

    /// Find a retained entry with the same content as `candidate`, or insert it.
    ///
    /// The candidate's `size` must already be set. Returns `Some(original)`
    /// when the candidate duplicates a retained entry; the candidate is then
    /// left unlinked and the caller owns it. Returns `None` after inserting
    /// the candidate, after which the index owns it.
    ///
    /// # Errors
    ///
    /// [`FinderError::Digest`] if a required digest cannot be computed. The
    /// index is left as it was before the call; the candidate is not linked.
    pub fn lookup_or_insert<D>(
        &mut self,
        pool: &mut EntryPool,
        candidate: EntryId,
        digester: &mut D,
    ) -> Result<Option<EntryId>, FinderError>
    where
        D: DigestProvider + ?Sized,
    {
        let size = pool.get(candidate).size;
        let bucket = self.bucket_of(size);
        log::debug!(
            "Search for file: {} (size: {}, bucket: {})",
            pool.get(candidate).path.display(),
            size,
            bucket
        );

        let current_head = self.buckets[bucket];
        let head = match current_head {
            Some(head) if pool.get(head).size <= size => head,
            other => {
                pool.get_mut(candidate).next = other;
                self.buckets[bucket] = Some(candidate);
                self.len += 1;
                return Ok(None);
            }
        };

        let mut last = head;
        let mut cursor = Some(head);
        while let Some(node) = cursor {
            let node_size = pool.get(node).size;
            if node_size > size {
                break;
            }
            if node_size == size {
                log::debug!("Matches (size) for {}", pool.get(node).path.display());
                self.ensure_digest(pool, candidate, digester)?;
                self.ensure_digest(pool, node, digester)?;
                if pool.get(node).digest == pool.get(candidate).digest {
                    log::debug!("Matches (hash)");
                    return Ok(Some(node));
                }
            }
            last = node;
            cursor = pool.get(node).next;
        }

        let after = pool.get(last).next;
        pool.get_mut(candidate).next = after;
        pool.get_mut(last).next = Some(candidate);
        self.len += 1;
        Ok(None)
    }

    /// Compute and cache the digest of `id` unless it is already known.
    fn ensure_digest<D>(
        &mut self,
        pool: &mut EntryPool,
        id: EntryId,
        digester: &mut D,
    ) -> Result<(), FinderError>
    where
        D: DigestProvider + ?Sized,
    {
        let entry = pool.get(id);
        if entry.has_digest() {
            return Ok(());
        }

        let digest = digester.digest(&entry.path)?;
        log::trace!("Digest {} for {}", digest, entry.path.display());
        self.digests_computed += 1;
        pool.get_mut(id).digest = Some(digest);
        Ok(())
    }
}

/// Iterator over one bucket chain.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    pool: &'a EntryPool,
    cursor: Option<EntryId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (EntryId, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.pool.get(id);
        self.cursor = entry.next;
        Some((id, entry))
    }
}
