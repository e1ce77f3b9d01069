use crate::error::BranchError;
use crate::ids::WorkerId;

/// The bag of values a branch accumulated at its own leaf.
pub type ValueBag<T> = Vec<T>;

/// A branch's outcome: a bag of leaf values, or the error that ended it.
pub type BranchResult<T> = Result<ValueBag<T>, BranchError>;

/// A message travelling on a child channel, consumed exactly once by the
/// reaper that owns that channel's receiving end.
#[derive(Debug)]
pub enum ChildEvent<T> {
    /// Sent by a spawned worker exactly once, whatever its outcome.
    ChildDone(WorkerId, BranchResult<T>),
    /// Relayed by a reaper on behalf of a descendant, or sent directly by a
    /// branch that ran in-line under the sync fallback (never assigned a
    /// worker id, so it has nothing to report against `pendingChildren`).
    PassOnResult(BranchResult<T>),
}
