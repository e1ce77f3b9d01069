use std::future::Future;

use crate::branch::Branch;
use crate::error::BranchError;
use crate::stream::BranchStream;
use crate::stream_data::StreamData;

use super::parallel::parallel;

/// `waitEvents(io) := parallel(More <$> io)` — an infinite stream of
/// values, one branch forked per successful call to `action`. A failed call
/// becomes a terminal `StreamData::Error`, ending the stream rather than
/// raising on the calling worker.
pub fn wait_events<T, E, F, Fut>(branch: &Branch, mut action: F) -> BranchStream<T>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    parallel(branch, move || {
        let next = action();
        async move {
            match next.await {
                Ok(v) => StreamData::More(v),
                Err(e) => StreamData::Error(BranchError::from_action(e)),
            }
        }
    })
}
