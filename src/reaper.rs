use tracing::{debug, warn};

use crate::context::Context;
use crate::error::BranchError;
use crate::event::ChildEvent;

/// Cancels every worker still in `ctx.pending` and clears the set.
///
/// A hard-aborted tokio task cannot be relied on to run its own worker frame
/// to completion, so it cannot be counted on to deliver the `ChildDone` a
/// normally-finishing worker always sends. We treat the abort itself as
/// conclusive and drop the bookkeeping entry rather than wait for an event
/// that may never arrive — the documented cost of best-effort cancellation.
pub(crate) fn cancel_pending<T>(ctx: &mut Context<T>) {
    for (id, handle) in ctx.pending.drain() {
        debug!(worker = %id, "cancelling sibling after sibling error");
        handle.abort();
    }
}

/// Applies one event's effect on `ctx`: removes/forwards as appropriate.
/// Returns `Some(e)` iff this particular event carried an error.
fn apply_event<T>(ctx: &mut Context<T>, ev: ChildEvent<T>) -> Option<BranchError> {
    match ev {
        ChildEvent::ChildDone(id, Ok(v)) => {
            ctx.pending.remove(&id);
            if !v.is_empty() {
                forward(ctx, Ok(v));
            }
            None
        }
        ChildEvent::ChildDone(id, Err(e)) => {
            ctx.pending.remove(&id);
            Some(e)
        }
        ChildEvent::PassOnResult(Ok(v)) => {
            forward(ctx, Ok(v));
            None
        }
        ChildEvent::PassOnResult(Err(e)) => Some(e),
    }
}

fn forward<T>(ctx: &Context<T>, result: crate::event::BranchResult<T>) {
    if let Some(tx) = &ctx.parent_tx {
        if tx.send(ChildEvent::PassOnResult(result)).is_err() {
            warn!("parent channel closed while forwarding a child result");
        }
    }
}

/// Non-blocking: drains whatever is already buffered on `ctx.child_rx`,
/// regardless of `ctx.pending`. A sync-fallback child is never registered in
/// `pending` (only spawned workers are, per invariant 5), but it still
/// forwards its `PassOnResult` over the same channel — so gating this drain
/// on `pending` being non-empty would leave those results buffered forever
/// whenever a branch never spawns a single worker (e.g. `threads(0, ..)`).
/// Draining unconditionally until the channel reports empty is always safe:
/// a single-reader channel has nothing else waiting on these messages.
/// Stops early (without draining further) on the first error, after
/// cancelling still-pending siblings, so the caller can fail fast.
pub(crate) fn try_reclaim<T>(ctx: &mut Context<T>) -> Result<(), BranchError> {
    loop {
        match ctx.child_rx.try_recv() {
            Ok(ev) => {
                if let Some(e) = apply_event(ctx, ev) {
                    cancel_pending(ctx);
                    return Err(e);
                }
            }
            Err(_) => return Ok(()),
        }
    }
}

/// Blocking: awaits and processes exactly one event. Callers only invoke
/// this when `ctx.pending` is known to be non-empty.
pub(crate) async fn wait_one<T>(ctx: &mut Context<T>) -> Result<(), BranchError> {
    match ctx.child_rx.recv().await {
        Some(ev) => {
            if let Some(e) = apply_event(ctx, ev) {
                cancel_pending(ctx);
                return Err(e);
            }
            Ok(())
        }
        None => Ok(()),
    }
}

/// Blocking: loops until `ctx.pending` is empty, combining `initial` with
/// whatever this drain observes. Once an exception is recorded — whether it
/// was already known at entry (`initial`) or discovered mid-drain — every
/// still-pending sibling is cancelled immediately (not just the ones
/// discovered after that point) and further events are consumed and
/// discarded (their ids still cleared from `pending`) rather than silently
/// dropped unaccounted for. A failure the caller already knows about is no
/// less of a reason to reclaim outstanding children than one this drain
/// finds itself — leaving them running unreclaimed is exactly the
/// unrecoverable-deadlock risk §9 ("Unreclaimable workers") warns about, and
/// there is no reason to wait for the blocking `recv` below to pay that cost
/// when cancellation was available up front.
///
/// Before (and between) each blocking wait, first drains whatever is
/// already buffered — same reasoning as `try_reclaim`: sync-fallback
/// results share the channel with spawned-worker `ChildDone`s but carry no
/// `pending` entry of their own, so a drain gated purely on `pending` being
/// non-empty could return without ever looking at the channel (if `pending`
/// started empty) and strand them.
pub(crate) async fn drain_all<T>(ctx: &mut Context<T>, initial: Option<BranchError>) -> Option<BranchError> {
    fn absorb<T>(ctx: &mut Context<T>, current: &mut Option<BranchError>, ev: ChildEvent<T>) {
        if current.is_some() {
            if let ChildEvent::ChildDone(id, _) = ev {
                ctx.pending.remove(&id);
            }
            return;
        }
        if let Some(e) = apply_event(ctx, ev) {
            cancel_pending(ctx);
            *current = Some(e);
        }
    }

    let mut current = initial;
    if current.is_some() {
        cancel_pending(ctx);
    }
    loop {
        while let Ok(ev) = ctx.child_rx.try_recv() {
            absorb(ctx, &mut current, ev);
        }
        if ctx.pending.is_empty() {
            break;
        }
        let Some(ev) = ctx.child_rx.recv().await else {
            break;
        };
        absorb(ctx, &mut current, ev);
    }
    current
}
