use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one spawned worker within the scope of its parent's pending set.
///
/// Unlike `spark-core`'s string-based, validated ids (`RequestId`, `CorrelationId`),
/// this id never crosses a process boundary — it only needs to be a cheap, unique
/// key into a parent's local `pending` map, so a monotonic counter is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u64);

impl WorkerId {
    pub(crate) fn next() -> Self {
        WorkerId(NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker#{}", self.0)
    }
}
