//! Allocation handles.
//!
//! An [`Allocation`] names a byte region inside one arena. It is
//! epoch-scoped: the `epoch` field lets the arena reject handles that
//! outlived a [`clear`](crate::Arena::clear) in O(1).

use std::fmt;

/// Location of a region handed out by [`Arena::allocate`](crate::Arena::allocate).
///
/// Resolve it with [`Arena::bytes`](crate::Arena::bytes) or
/// [`Arena::bytes_mut`](crate::Arena::bytes_mut). The memory belongs to
/// the arena; a handle cannot free it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Allocation {
    /// Identity of the arena that produced this handle.
    pub(crate) arena_id: u64,
    /// Arena epoch when this allocation was made.
    pub(crate) epoch: u32,
    /// Index of the chunk in the arena's chunk stack.
    pub(crate) chunk: usize,
    /// Byte offset within the chunk.
    pub(crate) offset: usize,
    /// Length of the region in bytes.
    pub(crate) len: usize,
}

impl Allocation {
    pub(crate) fn new(arena_id: u64, epoch: u32, chunk: usize, offset: usize, len: usize) -> Self {
        Self {
            arena_id,
            epoch,
            chunk,
            offset,
            len,
        }
    }

    /// The epoch this handle belongs to.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Index of the chunk holding the region.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Byte offset of the region within its chunk.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Allocation(epoch={}, chunk={}, off={}, len={})",
            self.epoch, self.chunk, self.offset, self.len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let a = Allocation::new(1, 4, 2, 128, 16);
        assert_eq!(a.epoch(), 4);
        assert_eq!(a.chunk(), 2);
        assert_eq!(a.offset(), 128);
        assert_eq!(a.len(), 16);
        assert!(!a.is_empty());
    }

    #[test]
    fn empty_allocation() {
        assert!(Allocation::new(1, 0, 0, 0, 0).is_empty());
    }

    #[test]
    fn display_format() {
        let a = Allocation::new(9, 1, 0, 8, 4);
        assert_eq!(a.to_string(), "Allocation(epoch=1, chunk=0, off=8, len=4)");
    }
}
