use crate::error::BranchError;

/// Signals how a `parallel` producer loop should continue.
#[derive(Debug)]
pub enum StreamData<T> {
    /// A value, with more to come.
    More(T),
    /// The final value; the producer stops after this one.
    Last(T),
    /// No more values; nothing to forward.
    Done,
    /// The action itself failed; delivered as a terminal event rather than
    /// raised as an exception on the producer's own worker.
    Error(BranchError),
}
