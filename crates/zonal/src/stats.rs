//! Point-in-time arena occupancy counters.

/// Occupancy and fragmentation counters for an [`Arena`](crate::Arena).
///
/// Returned by [`Arena::stats`](crate::Arena::stats). All byte counts are
/// payload bytes; per-chunk bookkeeping overhead is not included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of live chunks.
    pub chunk_count: usize,
    /// Total payload bytes across all live chunks.
    pub reserved_bytes: usize,
    /// Bytes still available in the head chunk.
    pub free_bytes: usize,
    /// Bytes stranded in superseded head chunks since the last clear.
    pub abandoned_bytes: usize,
    /// Cumulative number of chunk expansions since creation.
    pub expansions: u64,
    /// Number of pending finalizers.
    pub finalizer_count: usize,
    /// Allocated finalizer slots.
    pub finalizer_capacity: usize,
    /// Current epoch (number of clears so far).
    pub epoch: u32,
}

impl ArenaStats {
    /// Bytes handed out to callers, including alignment padding.
    pub fn used_bytes(&self) -> usize {
        self.reserved_bytes - self.free_bytes - self.abandoned_bytes
    }
}
