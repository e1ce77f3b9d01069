#[cfg(not(loom))]
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(not(loom))]
use std::sync::Arc;

#[cfg(loom)]
use loom::sync::atomic::{AtomicI64, Ordering};
#[cfg(loom)]
use loom::sync::Arc;

/// The shared fan-out budget: one unit funds one live worker.
///
/// A nested `threads(n, x)` scope does not mutate the enclosing handle — it
/// swaps in a fresh one for the duration of `x` (see `generators::threads`).
/// The counter never goes negative: `try_acquire` only succeeds while the
/// counter is strictly positive.
#[derive(Debug, Clone)]
pub struct CreditHandle {
    n: Arc<AtomicI64>,
}

impl CreditHandle {
    pub fn new(n: u32) -> Self {
        CreditHandle {
            n: Arc::new(AtomicI64::new(n as i64)),
        }
    }

    /// Non-blocking. Returns `true` iff a unit was taken.
    pub fn try_acquire(&self) -> bool {
        let mut current = self.n.load(Ordering::Acquire);
        loop {
            if current <= 0 {
                return false;
            }
            match self.n.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Must be called exactly once per successful `try_acquire`, by the worker
    /// that took the unit, before it sends its `ChildDone`.
    pub fn release(&self) {
        self.n.fetch_add(1, Ordering::AcqRel);
    }

    /// Units currently available to `try_acquire`. Never negative; a
    /// snapshot, not a reservation — racing callers may still fail to
    /// acquire immediately after observing a positive count here.
    pub fn current(&self) -> i64 {
        self.n.load(Ordering::Acquire)
    }
}


#[cfg(all(test, loom))]
mod loom_tests {
    use super::*;
    use loom::thread;

    // Mirrors spark-core's loom_concurrency.rs Budget test: two threads race
    // to acquire from a handle seeded with 1, and the counter must never go
    // negative and must return to its starting value once both release.
    #[test]
    fn concurrent_acquire_release_preserves_limit() {
        loom::model(|| {
            let credit = CreditHandle::new(1);
            let a = credit.clone();
            let b = credit.clone();

            let ta = thread::spawn(move || {
                if a.try_acquire() {
                    a.release();
                }
            });
            let tb = thread::spawn(move || {
                if b.try_acquire() {
                    b.release();
                }
            });

            ta.join().unwrap();
            tb.join().unwrap();

            assert_eq!(credit.current(), 1);
        });
    }
}
