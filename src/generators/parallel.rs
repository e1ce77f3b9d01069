use std::future::Future;

use crate::branch::Branch;
use crate::context::{Context, Location, Mailbox};
use crate::error::BranchError;
use crate::event::ChildEvent;
use crate::fork::credit_fork;
use crate::generators::leaf;
use crate::reaper::drain_all;
use crate::runner::drive;
use crate::stream::BranchStream;
use crate::stream_data::StreamData;

/// Implements `parallel`: repeatedly calls `action`, forking one
/// branch per `More`/`Last` item through the credit-governed gate, and
/// stopping on `Last`, `Done`, or `Error`.
pub fn parallel<T, F, Fut>(branch: &Branch, mut action: F) -> BranchStream<T>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = StreamData<T>> + Send + 'static,
    T: Send + 'static,
{
    let (mut root, out_rx) = Context::root(leaf(), branch.credit(), branch.initial_location());

    let producer = tokio::spawn(async move {
        let mut pending_err: Option<BranchError> = None;
        loop {
            match action().await {
                StreamData::More(v) => {
                    let child = Context::child_of(&root, leaf(), Mailbox::Resumed(v));
                    if let Err(e) = credit_fork(&mut root, child).await {
                        pending_err = Some(e);
                        break;
                    }
                    if root.location != Location::RemoteNode {
                        root.location = Location::WaitingParent;
                    }
                }
                StreamData::Last(v) => {
                    let mut child = Context::child_of(&root, leaf(), Mailbox::Resumed(v));
                    drive(&mut child).await;
                    break;
                }
                StreamData::Done => break,
                StreamData::Error(e) => {
                    pending_err = Some(e);
                    break;
                }
            }
        }
        // The producer itself never forks further after this point, but it
        // may still have live children from earlier `More` items; a subtree
        // is fully quiesced before its own completion, so drain them here —
        // and surface whatever error either this drain or the break above
        // turned up, instead of letting it vanish with the producer task.
        let outcome = drain_all(&mut root, pending_err).await;
        if let Some(e) = outcome {
            if let Some(tx) = &root.parent_tx {
                let _ = tx.send(ChildEvent::PassOnResult(Err(e)));
            }
        }
    });

    BranchStream::new(out_rx, producer)
}
