//! Deferred cleanup actions run in reverse registration order.
//!
//! [`FinalizerArray`] records [`Finalizer`] closures and runs them
//! last-registered-first when the arena is cleared or destroyed. Dependents
//! are usually built after the objects they depend on, so reverse order
//! finalizes them first without explicit dependency tracking.

use std::fmt;

use tracing::{debug, warn};

use crate::error::ArenaError;

/// A cleanup action that runs exactly once.
///
/// Wraps a boxed `FnOnce()` carrying both the action and the data it acts
/// on. Calling [`run`](Finalizer::run) consumes the finalizer.
pub struct Finalizer {
    callback: Box<dyn FnOnce()>,
}

impl Finalizer {
    /// Wrap a closure.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Wrap a callback together with the argument it will be called with.
    pub fn with_argument<T: 'static>(callback: fn(T), argument: T) -> Self {
        Self::new(move || callback(argument))
    }

    /// Invoke the callback.
    pub fn run(self) {
        (self.callback)()
    }
}

impl fmt::Debug for Finalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Finalizer")
    }
}

/// Smallest number of slots allocated on first growth.
///
/// Sized so the initial storage fills roughly one small (72-byte) heap
/// block; falls back to 8 when an entry is 36 bytes or larger.
pub const fn min_finalizer_capacity() -> usize {
    let entry = std::mem::size_of::<Finalizer>();
    if entry < 72 / 2 {
        72 / entry
    } else {
        8
    }
}

/// Growable, ordered list of pending [`Finalizer`]s.
///
/// Capacity grows to `max(len * 2, min_finalizer_capacity())` whenever a
/// registration finds the storage full. Growth is fallible: a failed
/// reservation is reported as [`ArenaError::OutOfMemory`] and the array is
/// left unchanged.
#[derive(Debug, Default)]
pub struct FinalizerArray {
    entries: Vec<Finalizer>,
}

impl FinalizerArray {
    /// Create an empty array. No storage is allocated until the first append.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record `finalizer` to run after everything already registered.
    ///
    /// On failure the finalizer is dropped without being run.
    pub fn append(&mut self, finalizer: Finalizer) -> Result<(), ArenaError> {
        if self.entries.len() == self.entries.capacity() {
            self.grow()?;
        }
        self.entries.push(finalizer);
        Ok(())
    }

    /// Run every pending finalizer, last registered first.
    ///
    /// Each entry is taken out of the array as it runs, so no finalizer can
    /// run twice. Storage capacity is kept.
    pub fn run_all_reverse(&mut self) -> usize {
        let mut ran = 0;
        while let Some(finalizer) = self.entries.pop() {
            finalizer.run();
            ran += 1;
        }
        ran
    }

    /// Run every pending finalizer in reverse and leave the array empty but
    /// with its capacity intact for reuse.
    pub fn run_all_reverse_and_reset(&mut self) {
        let ran = self.run_all_reverse();
        debug!(ran, capacity = self.capacity(), "finalizers reset");
    }

    /// Run every pending finalizer in reverse, then release the storage.
    pub fn destroy(&mut self) {
        let ran = self.run_all_reverse();
        self.entries = Vec::new();
        debug!(ran, "finalizers destroyed");
    }

    /// Number of registered, not yet run finalizers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no finalizers are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots allocated.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    fn grow(&mut self) -> Result<(), ArenaError> {
        let len = self.entries.len();
        let target = len.saturating_mul(2).max(min_finalizer_capacity());
        self.entries
            .try_reserve_exact(target - len)
            .map_err(|_| {
                warn!(len, target, "finalizer storage growth failed");
                ArenaError::OutOfMemory {
                    requested: target.saturating_mul(std::mem::size_of::<Finalizer>()),
                }
            })
    }
}

impl Drop for FinalizerArray {
    fn drop(&mut self) {
        self.run_all_reverse();
    }
}
