//! Entry allocator with slot reuse.
//!
//! # Overview
//!
//! Large scans create one [`Entry`] per non-empty file, and every duplicate
//! is thrown away right after it is detected. [`EntryPool`] keeps entries in
//! a growable arena and recycles released slots through a LIFO free list, so
//! a released slot is always handed out again before the arena grows.
//!
//! Retained entries stay allocated until the pool is dropped at the end of
//! the scan. The free list is unbounded.
//!
//! # Example
//!
//! ```
//! use dupscan::duplicates::EntryPool;
//! use std::path::PathBuf;
//!
//! let mut pool = EntryPool::new();
//! let first = pool.allocate(PathBuf::from("/a")).unwrap();
//! pool.release(first);
//!
//! let second = pool.allocate(PathBuf::from("/b")).unwrap();
//! assert_eq!(first, second);
//! assert_eq!(pool.capacity(), 1);
//! ```

use std::path::PathBuf;

use super::entry::{Entry, EntryId};
use super::FinderError;

/// Most live slots a pool can hand out; [`EntryId`] is 32 bits wide.
pub const MAX_ENTRIES: usize = u32::MAX as usize;

/// Arena of entries plus a free list of released slots.
#[derive(Debug)]
pub struct EntryPool {
    slots: Vec<Entry>,
    free: Vec<EntryId>,
    reused: usize,
    limit: usize,
}

impl Default for EntryPool {
    fn default() -> Self {
        Self::with_limit(MAX_ENTRIES)
    }
}

impl EntryPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pool that grows to at most `limit` slots
    /// (capped at [`MAX_ENTRIES`]).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            reused: 0,
            limit: limit.min(MAX_ENTRIES),
        }
    }

    /// Produce a zero-initialised entry owning `path`.
    ///
    /// A released slot is reused if one is available; otherwise the arena
    /// grows by one slot.
    ///
    /// # Errors
    ///
    /// [`FinderError::EntryLimit`] once the pool holds its limit of slots,
    /// [`FinderError::AllocationFailure`] if the arena cannot grow.
    pub fn allocate(&mut self, path: PathBuf) -> Result<EntryId, FinderError> {
        if let Some(id) = self.free.pop() {
            self.reused += 1;
            self.slots[id.index()] = Entry::blank(path);
            return Ok(id);
        }

        let id = EntryId::try_new(self.slots.len())
            .filter(|id| id.index() < self.limit)
            .ok_or_else(|| {
                log::error!("Entry limit reached at {}", path.display());
                FinderError::EntryLimit(self.limit)
            })?;
        self.slots.try_reserve(1).map_err(|source| {
            log::error!("Cannot allocate entry for {}", path.display());
            FinderError::AllocationFailure(source)
        })?;
        self.slots.push(Entry::blank(path));
        Ok(id)
    }

    /// Return an entry's slot to the free list.
    ///
    /// The path and digest are dropped and the chain link is discarded.
    /// The caller must not hold on to `id` afterwards.
    pub fn release(&mut self, id: EntryId) {
        debug_assert!(!self.free.contains(&id), "double release of {id}");
        self.slots[id.index()].clear();
        self.free.push(id);
    }

    /// Borrow an entry.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this pool.
    #[must_use]
    pub fn get(&self, id: EntryId) -> &Entry {
        &self.slots[id.index()]
    }

    /// Mutably borrow an entry.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this pool.
    pub fn get_mut(&mut self, id: EntryId) -> &mut Entry {
        &mut self.slots[id.index()]
    }

    /// Number of slots ever created.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently handed out.
    #[must_use]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of released slots waiting for reuse.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Number of allocations served from the free list.
    #[must_use]
    pub fn reused(&self) -> usize {
        self.reused
    }
}
