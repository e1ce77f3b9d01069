use tracing::trace;

use crate::context::{Context, Location};
use crate::error::BranchError;
use crate::ids::WorkerId;
use crate::reaper;
use crate::runner;
use crate::worker;

/// The admission-control gate: try a credit, spawn on success; on failure
/// either run in-line (no pending sibling to wait on) or block for one
/// sibling to finish and retry. An enclosing `sync(x)` — observed via
/// `Location::RemoteNode`, inherited down the whole nested subtree — skips
/// the gate entirely and always runs in-line, keeping a forced-sequential
/// scope sequential end to end.
pub(crate) async fn credit_fork<T: Send + 'static>(
    parent: &mut Context<T>,
    child: Context<T>,
) -> Result<(), BranchError> {
    if parent.location == Location::RemoteNode {
        trace!("forced-sync scope active, running child in-line");
        run_sync(child).await;
        // The child was never added to `parent.pending` (it was never
        // spawned), so nothing will otherwise reclaim the `PassOnResult` it
        // just placed on `parent.child_rx`. Reclaim eagerly rather than
        // leaving it buffered until some later, possibly-nonexistent drain.
        return reaper::try_reclaim(parent);
    }

    loop {
        if parent.credit.try_acquire() {
            let id = WorkerId::next();
            trace!(worker = %id, "admitted, spawning worker");
            let handle = tokio::spawn(worker::run_worker(id, child));
            // Registered before the reclaim pass so a child that has already
            // finished is found and removed, not mistaken for unknown.
            parent.pending.insert(id, handle.abort_handle());
            return reaper::try_reclaim(parent);
        }

        if parent.pending.is_empty() {
            trace!("no credit and no sibling to wait on, falling back to in-line");
            run_sync(child).await;
            // Same reasoning as the `RemoteNode` branch above: this child was
            // never registered in `pending`, so it needs an explicit reclaim.
            return reaper::try_reclaim(parent);
        }

        reaper::wait_one(parent).await?;
    }
}

/// Runs `child` to completion on the current worker. Its outcome is
/// forwarded through `child`'s own parent channel (which is `parent`'s child
/// channel — see `Context::child_of`) by `runner::drive`; the caller is
/// responsible for reclaiming it from that channel afterward, since a
/// sync-fallback child carries no `pending` entry of its own.
async fn run_sync<T: Send + 'static>(mut child: Context<T>) {
    runner::drive(&mut child).await;
}
