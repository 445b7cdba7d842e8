//! Arena error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The backing allocator could not satisfy a request (initial chunk,
    /// chunk expansion, or finalizer storage growth).
    OutOfMemory {
        /// Number of bytes (or finalizer slots) requested.
        requested: usize,
    },
    /// The arena configuration was rejected at construction.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// An alignment that is zero or not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// The arena was used after [`Arena::destroy`](crate::Arena::destroy).
    Destroyed,
    /// An [`Allocation`](crate::Allocation) created before the most recent
    /// [`Arena::clear`](crate::Arena::clear).
    StaleHandle {
        /// The epoch encoded in the handle.
        handle_epoch: u32,
        /// The arena's current epoch.
        current_epoch: u32,
    },
    /// An [`Allocation`](crate::Allocation) created by a different arena.
    ForeignHandle,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: requested {requested} bytes")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a nonzero power of two")
            }
            Self::Destroyed => write!(f, "arena used after destroy"),
            Self::StaleHandle {
                handle_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale handle: epoch {handle_epoch}, arena epoch {current_epoch}"
                )
            }
            Self::ForeignHandle => write!(f, "handle belongs to a different arena"),
        }
    }
}

impl Error for ArenaError {}
