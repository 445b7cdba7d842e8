//! Region-based bump allocation with reverse-order finalizers.
//!
//! An [`Arena`] hands out byte regions from a stack of chunks with O(1)
//! bump allocation, and records cleanup closures ("finalizers") that run
//! last-registered-first when the arena is cleared, destroyed or dropped.
//! Regions are never freed individually; everything allocated in one scope
//! is released together.
//!
//! # Architecture
//!
//! ```text
//! Arena (facade)
//! ├── ChunkList → Chunk[] (index stack, head last, bump cursor in head)
//! ├── FinalizerArray → Finalizer[] (Box<dyn FnOnce()>, run in reverse)
//! └── ArenaConfig (baseline chunk size, default alignment)
//! ```
//!
//! # Handles
//!
//! [`Arena::allocate`] returns an [`Allocation`] handle rather than a raw
//! pointer. Handles are resolved through [`Arena::bytes`] and
//! [`Arena::bytes_mut`]. Each handle carries the epoch it was created in;
//! [`Arena::clear`] advances the epoch, so a handle that outlives a clear is
//! reported as stale instead of aliasing fresh data.
//!
//! # Safety
//!
//! The crate contains no `unsafe` code. Chunks are zero-initialised
//! `Box<[u8]>` buffers obtained through fallible reservation, so allocator
//! exhaustion surfaces as [`ArenaError::OutOfMemory`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod chunk;
pub mod config;
pub mod error;
pub mod finalizer;
pub mod handle;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use chunk::{next_chunk_size, ChunkList};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use finalizer::{min_finalizer_capacity, FinalizerArray};
pub use handle::Allocation;
pub use stats::ArenaStats;
