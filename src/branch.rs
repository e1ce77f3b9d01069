use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::context::Location;
use crate::credit::CreditHandle;
use crate::pool::Threads;

/// The handle every generator in this crate takes in place of implicit,
/// ambient branch state.
///
/// A scheduler could carry `location`/credit through thread-local or
/// task-local storage instead, but that hides the dependency and makes
/// testing harder to reason about; callers pass a `Branch` explicitly, the
/// same way `spark-core`'s contract types are threaded explicitly rather
/// than assumed ambient. A `Branch` wraps a
/// `Threads` pool plus a shared override flag that `sync(..)` raises for
/// the duration of a nested sub-computation, so a `sync` scope entered by
/// one generator call is visible to any other generator called with the
/// same `Branch` further down the call stack.
#[derive(Debug, Clone)]
pub struct Branch {
    threads: Threads,
    forced_sync: Arc<AtomicBool>,
}

impl Branch {
    /// Starts a fresh branch over `threads`, with no `sync` override active.
    pub fn new(threads: Threads) -> Self {
        Branch {
            threads,
            forced_sync: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Credit units this branch's pool currently has available.
    pub fn available(&self) -> u32 {
        self.threads.available()
    }

    pub(crate) fn credit(&self) -> CreditHandle {
        self.threads.credit()
    }

    /// The `Location` a fresh root context started from this branch should
    /// carry: `RemoteNode` iff a `sync(..)` scope using this branch is
    /// currently active, forcing the new root's whole subtree sequential.
    pub(crate) fn initial_location(&self) -> Location {
        if self.forced_sync.load(Ordering::Acquire) {
            Location::RemoteNode
        } else {
            Location::Worker
        }
    }

    pub(crate) fn enter_sync(&self) -> bool {
        self.forced_sync.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn restore_sync(&self, prev: bool) {
        self.forced_sync.store(prev, Ordering::Release);
    }
}

impl From<Threads> for Branch {
    fn from(threads: Threads) -> Self {
        Branch::new(threads)
    }
}
