use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::warn;

use crate::context::Context;
use crate::error::BranchError;
use crate::event::{BranchResult, ChildEvent};
use crate::reaper;

/// Drives `ctx.continuation` to completion, converting a panic into a
/// `BranchError::Panicked`, then unconditionally drains `ctx`'s own pending
/// children before reporting an outcome — a subtree is fully quiesced
/// before its own completion is observed by anyone, whether this context
/// was spawned as a worker or run in-line under the sync fallback.
pub(crate) async fn run_to_outcome<T: Send + 'static>(ctx: &mut Context<T>) -> BranchResult<T> {
    let continuation = ctx.continuation.clone();
    let local_err = match AssertUnwindSafe(continuation(ctx)).catch_unwind().await {
        Ok(()) => None,
        Err(payload) => Some(BranchError::from_panic(payload)),
    };

    if local_err.is_some() {
        reaper::cancel_pending(ctx);
    }

    match reaper::drain_all(ctx, local_err).await {
        Some(e) => Err(e),
        None => Ok(std::mem::take(&mut ctx.accum)),
    }
}

/// The full continuation-runner contract: runs the branch to an outcome,
/// then — if this context has a parent to report to — forwards a
/// `PassOnResult` per the non-root completion rule: always on error, only
/// on success when the leaf bag is non-empty. Used for every non-worker
/// branch (the root producer, and every sync-fallback child); a spawned
/// worker instead wraps the outcome into exactly one `ChildDone` (see
/// `worker::run_worker`), which must be sent unconditionally.
pub(crate) async fn drive<T: Send + 'static>(ctx: &mut Context<T>) {
    let outcome = run_to_outcome(ctx).await;
    let Some(tx) = ctx.parent_tx.clone() else {
        return;
    };
    let send_result = match outcome {
        Err(e) => Some(ChildEvent::PassOnResult(Err(e))),
        Ok(v) if !v.is_empty() => Some(ChildEvent::PassOnResult(Ok(v))),
        Ok(_) => None,
    };
    if let Some(ev) = send_result {
        if tx.send(ev).is_err() {
            warn!("parent channel closed before branch result could be delivered");
        }
    }
}
