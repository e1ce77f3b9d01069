use crate::credit::CreditHandle;

/// The entry point for a tree of branches: the fan-out credit every
/// generator call forks against. `spec.md` treats this as ambient/monadic
/// state; Rust has no equivalent without a runtime-wide thread-local, so
/// callers hold one explicitly and pass it to `parallel`/`wait_events`/
/// `sample`/`async_once`, the same way `spark-core`'s contract types are
/// threaded explicitly rather than assumed ambient.
#[derive(Debug, Clone)]
pub struct Threads {
    credit: CreditHandle,
}

impl Threads {
    pub fn new(n: u32) -> Self {
        Threads {
            credit: CreditHandle::new(n),
        }
    }

    pub(crate) fn credit(&self) -> CreditHandle {
        self.credit.clone()
    }

    /// Credit units currently available for a new fork. Mirrors
    /// `tokio::sync::Semaphore::available_permits` — a snapshot for
    /// diagnostics and tests, not something callers should branch
    /// scheduling decisions on.
    pub fn available(&self) -> u32 {
        self.credit.current().max(0) as u32
    }
}
