//! The arena facade.
//!
//! [`Arena`] combines a [`ChunkList`] for bump allocation with a
//! [`FinalizerArray`] for deferred cleanup. The lifecycle is:
//!
//! 1. `new()` / `with_config()`: allocate the baseline chunk
//! 2. `allocate*()` and `register_finalizer*()`: any number of times
//! 3. `clear()`: run finalizers, keep the baseline chunk, reuse from step 2
//! 4. `destroy()` (or drop): run finalizers, release every chunk

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::chunk::ChunkList;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::finalizer::{Finalizer, FinalizerArray};
use crate::handle::Allocation;
use crate::stats::ArenaStats;

/// Source of process-unique arena ids, used to reject foreign handles.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// A region of memory from which byte regions are bump-allocated and
/// released all at once.
///
/// Regions are never freed individually. Their contents are unspecified
/// until written: fresh chunks are zeroed, but space reused after
/// [`clear`](Arena::clear) still holds whatever was written before.
///
/// An `Arena` is single-threaded; it is neither `Send` nor `Sync` because
/// finalizer closures are not required to be.
///
/// # Example
///
/// ```
/// use zonal::Arena;
///
/// let mut arena = Arena::new(64)?;
/// let hello = arena.allocate_copy(b"hello")?;
/// assert_eq!(arena.bytes(&hello)?, b"hello");
///
/// arena.register_finalizer(|| println!("scope closed"))?;
/// arena.clear()?;
/// assert!(arena.is_empty());
/// # Ok::<(), zonal::ArenaError>(())
/// ```
pub struct Arena {
    chunks: ChunkList,
    finalizers: FinalizerArray,
    config: ArenaConfig,
    /// Process-unique identity stamped into every handle.
    id: u64,
    /// Advanced on every clear that discards state.
    epoch: u32,
}

impl Arena {
    /// Create an arena whose baseline chunk holds `baseline_size` bytes.
    ///
    /// Returns `Err(ArenaError::OutOfMemory)` if the first chunk cannot be
    /// allocated, or `Err(ArenaError::InvalidConfig)` for a zero size.
    pub fn new(baseline_size: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(baseline_size))
    }

    /// Create an arena from a full configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let chunks = ChunkList::init(config.chunk_size)?;
        let id = NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed);
        debug!(arena = id, chunk_size = config.chunk_size, "arena created");
        Ok(Self {
            chunks,
            finalizers: FinalizerArray::new(),
            config,
            id,
            epoch: 0,
        })
    }

    /// Bump-allocate `size` bytes with no alignment guarantee.
    ///
    /// Requests larger than the baseline chunk size are served from a new,
    /// larger chunk.
    pub fn allocate(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        let (chunk, offset) = self.chunks.allocate(size)?;
        Ok(self.handle(chunk, offset, size))
    }

    /// Bump-allocate `size` bytes starting at an address that is a multiple
    /// of `align`.
    ///
    /// `align` must be a nonzero power of two.
    pub fn allocate_aligned(&mut self, size: usize, align: usize) -> Result<Allocation, ArenaError> {
        let (chunk, offset) = self.chunks.allocate_aligned(size, align)?;
        Ok(self.handle(chunk, offset, size))
    }

    /// Bump-allocate `size` bytes at the configured default alignment.
    pub fn allocate_default_aligned(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        self.allocate_aligned(size, self.config.align)
    }

    /// Allocate a region and copy `src` into it.
    pub fn allocate_copy(&mut self, src: &[u8]) -> Result<Allocation, ArenaError> {
        let handle = self.allocate(src.len())?;
        self.bytes_mut(&handle)?.copy_from_slice(src);
        Ok(handle)
    }

    /// Register a cleanup closure to run on the next clear, destroy or drop.
    ///
    /// Finalizers run in reverse registration order. If storage for the
    /// entry cannot be allocated, `Err(ArenaError::OutOfMemory)` is returned
    /// and `finalizer` is dropped without running; the caller decides
    /// whether that is fatal.
    pub fn register_finalizer<F>(&mut self, finalizer: F) -> Result<(), ArenaError>
    where
        F: FnOnce() + 'static,
    {
        self.ensure_live()?;
        self.finalizers.append(Finalizer::new(finalizer))
    }

    /// Register `callback` to be called with `argument` on cleanup.
    pub fn register_finalizer_with<T: 'static>(
        &mut self,
        callback: fn(T),
        argument: T,
    ) -> Result<(), ArenaError> {
        self.ensure_live()?;
        self.finalizers
            .append(Finalizer::with_argument(callback, argument))
    }

    /// Run all finalizers in reverse order and reset to the post-`new` state.
    ///
    /// The baseline chunk is kept for reuse; every other chunk is released.
    /// Every [`Allocation`] handed out before the clear becomes stale.
    /// Clearing an arena that is already empty does nothing.
    pub fn clear(&mut self) -> Result<(), ArenaError> {
        self.ensure_live()?;
        if self.is_empty() {
            return Ok(());
        }
        self.finalizers.run_all_reverse_and_reset();
        self.chunks.clear();
        self.epoch = self.epoch.wrapping_add(1);
        debug!(arena = self.id, epoch = self.epoch, "arena cleared");
        Ok(())
    }

    /// Run all finalizers in reverse order and release every chunk.
    ///
    /// The arena is unusable afterwards: every later operation returns
    /// [`ArenaError::Destroyed`].
    pub fn destroy(&mut self) -> Result<(), ArenaError> {
        self.ensure_live()?;
        self.finalizers.destroy();
        self.chunks.destroy();
        debug!(arena = self.id, "arena destroyed");
        Ok(())
    }

    /// Whether nothing has been allocated or registered since creation or
    /// the last clear. Always `false` once destroyed.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty() && self.finalizers.is_empty()
    }

    /// Whether [`destroy`](Arena::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.chunks.is_destroyed()
    }

    /// Shared view of an allocated region.
    pub fn bytes(&self, handle: &Allocation) -> Result<&[u8], ArenaError> {
        self.validate(handle)?;
        self.chunks
            .bytes(handle.chunk, handle.offset, handle.len)
            .ok_or(ArenaError::ForeignHandle)
    }

    /// Mutable view of an allocated region.
    pub fn bytes_mut(&mut self, handle: &Allocation) -> Result<&mut [u8], ArenaError> {
        self.validate(handle)?;
        self.chunks
            .bytes_mut(handle.chunk, handle.offset, handle.len)
            .ok_or(ArenaError::ForeignHandle)
    }

    /// Exchange the complete contents of two arenas.
    ///
    /// Handles follow the memory they name: a handle from `self` resolves
    /// through `other` after the swap.
    pub fn swap(&mut self, other: &mut Arena) {
        std::mem::swap(self, other);
    }

    /// Configured baseline chunk size in bytes.
    pub fn baseline_size(&self) -> usize {
        self.config.chunk_size
    }

    /// The arena's configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Current occupancy counters.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            chunk_count: self.chunks.chunk_count(),
            reserved_bytes: self.chunks.reserved_bytes(),
            free_bytes: self.chunks.free(),
            abandoned_bytes: self.chunks.abandoned_bytes(),
            expansions: self.chunks.expansions(),
            finalizer_count: self.finalizers.len(),
            finalizer_capacity: self.finalizers.capacity(),
            epoch: self.epoch,
        }
    }

    fn handle(&self, chunk: usize, offset: usize, len: usize) -> Allocation {
        Allocation::new(self.id, self.epoch, chunk, offset, len)
    }

    fn ensure_live(&self) -> Result<(), ArenaError> {
        if self.is_destroyed() {
            return Err(ArenaError::Destroyed);
        }
        Ok(())
    }

    fn validate(&self, handle: &Allocation) -> Result<(), ArenaError> {
        self.ensure_live()?;
        if handle.arena_id != self.id {
            return Err(ArenaError::ForeignHandle);
        }
        if handle.epoch != self.epoch {
            return Err(ArenaError::StaleHandle {
                handle_epoch: handle.epoch,
                current_epoch: self.epoch,
            });
        }
        Ok(())
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        if !self.is_destroyed() {
            self.finalizers.destroy();
            self.chunks.destroy();
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("epoch", &self.epoch)
            .field("config", &self.config)
            .field("chunks", &self.chunks.chunk_count())
            .field("free", &self.chunks.free())
            .field("finalizers", &self.finalizers.len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
