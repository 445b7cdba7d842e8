//! Benchmark workloads for the zonal arena allocator.
//!
//! Provides fixed allocation profiles shared by the criterion benches:
//!
//! - [`SMALL_OBJECT_SIZES`]: short strings and scalar payloads
//! - [`decode_profile`]: one simulated message decode into an arena

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use zonal::{Arena, ArenaError};

/// Repeating size pattern typical of decoded message fields, in bytes.
pub const SMALL_OBJECT_SIZES: [usize; 8] = [8, 16, 5, 24, 32, 3, 64, 12];

/// Simulate decoding one message of `objects` fields into `arena`.
///
/// Every field is allocated at pointer alignment, every sixteenth field
/// registers a finalizer, and one oversized payload forces an expansion
/// when `with_blob` is set. Returns the number of bytes requested.
pub fn decode_profile(arena: &mut Arena, objects: usize, with_blob: bool) -> Result<usize, ArenaError> {
    let mut requested = 0;
    for i in 0..objects {
        let size = SMALL_OBJECT_SIZES[i % SMALL_OBJECT_SIZES.len()];
        arena.allocate_default_aligned(size)?;
        requested += size;
        if i % 16 == 0 {
            arena.register_finalizer(|| {})?;
        }
    }
    if with_blob {
        let blob = arena.baseline_size() * 3;
        arena.allocate(blob)?;
        requested += blob;
    }
    Ok(requested)
}
