use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::credit::CreditHandle;
use crate::event::ChildEvent;
use crate::ids::WorkerId;

pub type BoxFuture<'a, O> = Pin<Box<dyn Future<Output = O> + Send + 'a>>;

/// The resumable body of a branch. Shared (`Arc`, not `Box`) because every
/// child forked by a single `parallel`/`waitEvents` call reuses the same
/// leaf body — only the mailbox content differs per branch.
pub type Continuation<T> = std::sync::Arc<dyn for<'a> Fn(&'a mut Context<T>) -> BoxFuture<'a, ()> + Send + Sync>;

/// The one-slot hand-off between a generator and its resumed continuation.
#[derive(Debug, Default)]
pub enum Mailbox<T> {
    #[default]
    Pending,
    Resumed(T),
}

impl<T> Mailbox<T> {
    pub(crate) fn take_resumed(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Mailbox::Resumed(v) => Some(v),
            Mailbox::Pending => None,
        }
    }
}

/// Where a branch currently stands with respect to delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Default: may fork further children.
    Worker,
    /// Has delegated its downstream work to forked children; produces no
    /// local result of its own.
    WaitingParent,
    /// Forced local execution by an enclosing `sync(x)`; suppresses forking
    /// for the whole nested subtree, not just the immediate action.
    RemoteNode,
}

/// Per-branch state: saved continuation, mailbox, channels, pending set,
/// shared credit, accumulated leaf values, delegation state.
///
/// Exclusively owned by the worker executing it; shared state is reached
/// only through `parent_tx`/`child_rx` and the `credit` handle.
pub struct Context<T> {
    pub(crate) continuation: Continuation<T>,
    pub(crate) mailbox: Mailbox<T>,
    pub(crate) parent_tx: Option<mpsc::UnboundedSender<ChildEvent<T>>>,
    pub(crate) child_tx: mpsc::UnboundedSender<ChildEvent<T>>,
    pub(crate) child_rx: mpsc::UnboundedReceiver<ChildEvent<T>>,
    pub(crate) pending: HashMap<WorkerId, AbortHandle>,
    pub(crate) credit: CreditHandle,
    pub(crate) accum: Vec<T>,
    pub(crate) location: Location,
}

impl<T> Context<T> {
    /// Builds a root context and returns the receiving end that observes
    /// every value and error the subtree ever forwards. The root has no
    /// `ChildDone` of its own to send — whoever holds this receiver (a
    /// `BranchStream`, an `async_once` future) is its sink, not a sibling.
    pub(crate) fn root(
        continuation: Continuation<T>,
        credit: CreditHandle,
        location: Location,
    ) -> (Self, mpsc::UnboundedReceiver<ChildEvent<T>>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (child_tx, child_rx) = mpsc::unbounded_channel();
        let ctx = Context {
            continuation,
            mailbox: Mailbox::Pending,
            parent_tx: Some(out_tx),
            child_tx,
            child_rx,
            pending: HashMap::new(),
            credit,
            accum: Vec::new(),
            location,
        };
        (ctx, out_rx)
    }

    /// Builds a child context wired so its completion is observed on the
    /// parent's own child channel. `location` is inherited from the parent
    /// so a `sync(x)` scope forces its whole nested subtree sequential, not
    /// only the branch directly under it.
    pub(crate) fn child_of(parent: &Context<T>, continuation: Continuation<T>, mailbox: Mailbox<T>) -> Self {
        let (child_tx, child_rx) = mpsc::unbounded_channel();
        Context {
            continuation,
            mailbox,
            parent_tx: Some(parent.child_tx.clone()),
            child_tx,
            child_rx,
            pending: HashMap::new(),
            credit: parent.credit.clone(),
            accum: Vec::new(),
            location: parent.location,
        }
    }
}
