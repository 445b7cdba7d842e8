//! Raw memory chunks and the growable chunk stack.
//!
//! A [`Chunk`] is a contiguous, zero-initialised byte buffer. A
//! [`ChunkList`] is a LIFO stack of chunks with a bump cursor in the newest
//! one (the head). When a request does not fit in the head, a new chunk is
//! pushed and the head's unused tail is abandoned until the next
//! [`ChunkList::clear`].

use tracing::{debug, trace, warn};

use crate::error::ArenaError;

/// Payload size of the chunk needed to hold `requested` bytes.
///
/// Starts from `baseline` and doubles until the result is at least
/// `requested`. A baseline that already fits is returned unchanged. Growth
/// is bounded by the request, not by how much space the current head has
/// left. Returns `None` if doubling overflows `usize`.
///
/// A zero baseline is treated as one byte so the function always terminates.
pub fn next_chunk_size(baseline: usize, requested: usize) -> Option<usize> {
    let mut size = baseline.max(1);
    while size < requested {
        size = size.checked_mul(2)?;
    }
    Some(size)
}

/// A single contiguous block of arena memory.
///
/// Chunks never shrink or move. They are released only when the owning
/// [`ChunkList`] is cleared (all but the oldest) or destroyed.
pub struct Chunk {
    /// Backing storage; `len()` is the payload size.
    data: Vec<u8>,
}

impl Chunk {
    /// Allocate a zero-initialised chunk of `size` bytes.
    ///
    /// Returns `Err(ArenaError::OutOfMemory)` if the global allocator cannot
    /// provide the memory.
    pub fn try_new(size: usize) -> Result<Self, ArenaError> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| ArenaError::OutOfMemory { requested: size })?;
        data.resize(size, 0);
        Ok(Self { data })
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk has a zero-byte payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Address of the first payload byte, used for alignment arithmetic.
    fn base_addr(&self) -> usize {
        self.data.as_ptr().addr()
    }
}

/// A stack of [`Chunk`]s with bump allocation in the head.
///
/// Chunks are kept in a `Vec` with the head last; the chunk at index
/// `i - 1` is the one that was head before chunk `i` was pushed. Returned
/// locations are `(chunk_index, offset)` pairs.
///
/// # Invariants
///
/// - `free == head.len() - cursor` while the list is live.
/// - `chunks[0]` is the first chunk ever allocated and has `baseline_size` bytes.
/// - After [`destroy`](ChunkList::destroy) the stack is empty and every
///   allocating operation returns [`ArenaError::Destroyed`].
pub struct ChunkList {
    chunks: Vec<Chunk>,
    /// Offset of the next free byte in the head chunk.
    cursor: usize,
    /// Bytes remaining in the head chunk after `cursor`.
    free: usize,
    baseline_size: usize,
    /// Number of chunks pushed by expansion since creation.
    expansions: u64,
    /// Bytes left unused in superseded heads since the last clear.
    abandoned: usize,
}

impl ChunkList {
    /// Create a list holding one chunk of `baseline_size` bytes.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` for a zero baseline and
    /// `Err(ArenaError::OutOfMemory)` if the first chunk cannot be allocated.
    pub fn init(baseline_size: usize) -> Result<Self, ArenaError> {
        if baseline_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk_size must be nonzero".to_string(),
            });
        }
        let mut chunks = Vec::new();
        chunks
            .try_reserve_exact(1)
            .map_err(|_| ArenaError::OutOfMemory {
                requested: baseline_size,
            })?;
        chunks.push(Chunk::try_new(baseline_size)?);
        Ok(Self {
            chunks,
            cursor: 0,
            free: baseline_size,
            baseline_size,
            expansions: 0,
            abandoned: 0,
        })
    }

    /// Bump-allocate `size` bytes, pushing a new chunk if the head is too full.
    pub fn allocate(&mut self, size: usize) -> Result<(usize, usize), ArenaError> {
        if self.is_destroyed() {
            return Err(ArenaError::Destroyed);
        }
        if size <= self.free {
            return Ok(self.allocate_fast(size));
        }
        self.expand_and_allocate(size)
    }

    /// Bump-allocate `size` bytes from the head chunk.
    ///
    /// The caller guarantees `size <= free`; there is no failure path.
    pub fn allocate_fast(&mut self, size: usize) -> (usize, usize) {
        debug_assert!(size <= self.free, "fast path requires size <= free");
        let offset = self.cursor;
        self.cursor += size;
        self.free -= size;
        (self.head_index(), offset)
    }

    /// Push a chunk large enough for `size` bytes and allocate from its start.
    ///
    /// The new chunk's size comes from [`next_chunk_size`]. The previous
    /// head stays in the stack with its unused tail abandoned. On failure
    /// the list is left exactly as it was.
    pub fn expand_and_allocate(&mut self, size: usize) -> Result<(usize, usize), ArenaError> {
        if self.is_destroyed() {
            return Err(ArenaError::Destroyed);
        }
        let chunk_size = next_chunk_size(self.baseline_size, size)
            .ok_or(ArenaError::OutOfMemory { requested: size })?;
        self.push_chunk(chunk_size, size)?;
        Ok(self.allocate_fast(size))
    }

    /// Bump-allocate `size` bytes whose address is a multiple of `align`.
    ///
    /// Padding is skipped in the head when the padded request fits. Otherwise
    /// a chunk sized for `size + align - 1` is pushed so that alignment
    /// inside it always succeeds.
    pub fn allocate_aligned(
        &mut self,
        size: usize,
        align: usize,
    ) -> Result<(usize, usize), ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }
        if self.is_destroyed() {
            return Err(ArenaError::Destroyed);
        }

        let pad = self.head_padding(align);
        if pad.checked_add(size).is_some_and(|needed| needed <= self.free) {
            self.cursor += pad;
            self.free -= pad;
            return Ok(self.allocate_fast(size));
        }

        let request = size
            .checked_add(align - 1)
            .ok_or(ArenaError::OutOfMemory { requested: size })?;
        let chunk_size = next_chunk_size(self.baseline_size, request)
            .ok_or(ArenaError::OutOfMemory { requested: request })?;
        self.push_chunk(chunk_size, request)?;

        let pad = self.head_padding(align);
        self.cursor = pad;
        self.free = chunk_size - pad;
        Ok(self.allocate_fast(size))
    }

    /// Release every chunk except the oldest and rewind the cursor.
    ///
    /// The retained chunk is reused by the next allocation burst, so a
    /// cleared list serves requests up to `baseline_size` without touching
    /// the global allocator. Clearing a destroyed list does nothing.
    pub fn clear(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let released = self.chunks.len() - 1;
        self.chunks.truncate(1);
        self.cursor = 0;
        self.free = self.baseline_size;
        self.abandoned = 0;
        debug!(released, baseline = self.baseline_size, "chunk list cleared");
    }

    /// Release every chunk. The list is unusable afterwards.
    pub fn destroy(&mut self) {
        let released = self.chunks.len();
        self.chunks = Vec::new();
        self.cursor = 0;
        self.free = 0;
        self.abandoned = 0;
        debug!(released, "chunk list destroyed");
    }

    /// Whether only the original chunk remains and nothing was taken from it.
    pub fn is_empty(&self) -> bool {
        self.chunks.len() == 1 && self.free == self.baseline_size
    }

    /// Whether [`destroy`](ChunkList::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Shared view of `len` bytes at `offset` in chunk `chunk`.
    ///
    /// Returns `None` if the range does not lie inside a live chunk.
    pub fn bytes(&self, chunk: usize, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.chunks.get(chunk)?.data.get(offset..end)
    }

    /// Mutable view of `len` bytes at `offset` in chunk `chunk`.
    ///
    /// Returns `None` if the range does not lie inside a live chunk.
    pub fn bytes_mut(&mut self, chunk: usize, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        self.chunks.get_mut(chunk)?.data.get_mut(offset..end)
    }

    /// Configured baseline chunk size in bytes.
    pub fn baseline_size(&self) -> usize {
        self.baseline_size
    }

    /// Bytes remaining in the head chunk.
    pub fn free(&self) -> usize {
        self.free
    }

    /// Offset of the bump cursor within the head chunk.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of live chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks pushed by expansion since creation. Not reset by clear.
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Bytes stranded in superseded heads since the last clear.
    pub fn abandoned_bytes(&self) -> usize {
        self.abandoned
    }

    /// Total payload bytes across all live chunks.
    pub fn reserved_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }

    fn head_index(&self) -> usize {
        self.chunks.len().saturating_sub(1)
    }

    /// Bytes to skip so the cursor address is a multiple of `align`.
    fn head_padding(&self, align: usize) -> usize {
        let addr = self.chunks[self.head_index()].base_addr() + self.cursor;
        addr.wrapping_neg() & (align - 1)
    }

    /// Allocate a chunk of `chunk_size` bytes and make it the head.
    fn push_chunk(&mut self, chunk_size: usize, requested: usize) -> Result<(), ArenaError> {
        let reserved = self.chunks.try_reserve(1);
        let chunk = reserved
            .map_err(|_| ArenaError::OutOfMemory {
                requested: chunk_size,
            })
            .and_then(|()| Chunk::try_new(chunk_size));
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!(requested, chunk_size, "chunk expansion failed");
                return Err(err);
            }
        };

        trace!(
            requested,
            chunk_size,
            abandoned = self.free,
            chunks = self.chunks.len() + 1,
            "chunk list expanded"
        );
        self.abandoned += self.free;
        self.expansions += 1;
        self.chunks.push(chunk);
        self.cursor = 0;
        self.free = chunk_size;
        Ok(())
    }
}
