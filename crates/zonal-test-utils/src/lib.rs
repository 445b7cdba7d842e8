//! Test utilities for zonal development.
//!
//! Provides fixtures shared by the integration tests and benchmarks:
//!
//! - [`FinalizerLog`]: records the order in which finalizers run.
//! - [`DropCounter`]: counts how many guarded values were dropped.
//! - [`init_tracing`]: installs a test-friendly `tracing` subscriber.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

/// Shared, clonable log of finalizer invocations.
///
/// Hand out closures with [`recorder`](FinalizerLog::recorder) and inspect
/// the invocation order with [`entries`](FinalizerLog::entries).
#[derive(Clone, Debug, Default)]
pub struct FinalizerLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl FinalizerLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closure that appends `label` to the log when called.
    pub fn recorder(&self, label: impl Into<String>) -> impl FnOnce() + 'static {
        self.record(label.into())
    }

    fn record(&self, label: String) -> impl FnOnce() + 'static {
        let entries = Rc::clone(&self.entries);
        move || entries.borrow_mut().push(label)
    }

    /// Labels recorded so far, in invocation order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of recorded invocations.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Counts drops of the [`DropGuard`]s it hands out.
#[derive(Clone, Debug, Default)]
pub struct DropCounter {
    count: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A value that bumps the counter when dropped.
    pub fn guard(&self) -> DropGuard {
        DropGuard {
            count: Rc::clone(&self.count),
        }
    }

    /// Number of guards dropped so far.
    pub fn dropped(&self) -> usize {
        self.count.get()
    }
}

/// Value handed out by [`DropCounter::guard`].
#[derive(Debug)]
pub struct DropGuard {
    count: Rc<Cell<usize>>,
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.count.set(self.count.get() + 1);
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// The filter is read from `RUST_LOG` and defaults to `zonal=debug`.
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zonal=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
