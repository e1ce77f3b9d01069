use tracing::{trace, warn};

use crate::context::Context;
use crate::event::ChildEvent;
use crate::ids::WorkerId;
use crate::runner;

/// The worker frame: drives a spawned child to an outcome, releases the
/// credit its forker acquired, and sends exactly one `ChildDone` — this
/// unconditional send is what lets a parent reliably account for every
/// *spawned* branch (the sync-fallback path instead goes through
/// `runner::drive`, which only forwards a `PassOnResult` and only when
/// there is something to report).
pub(crate) async fn run_worker<T: Send + 'static>(id: WorkerId, mut ctx: Context<T>) {
    let outcome = runner::run_to_outcome(&mut ctx).await;
    ctx.credit.release();
    trace!(worker = %id, ok = outcome.is_ok(), "worker releasing credit");

    if let Some(tx) = &ctx.parent_tx {
        if tx.send(ChildEvent::ChildDone(id, outcome)).is_err() {
            warn!(worker = %id, "parent channel closed before ChildDone could be delivered");
        }
    }
}
