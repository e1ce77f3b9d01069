use std::future::Future;

use futures::StreamExt;

use crate::branch::Branch;
use crate::error::BranchError;
use crate::stream_data::StreamData;

use super::parallel::parallel;

/// `async(io) := parallel(Last <$> io)` — a single deferred value. Named
/// `async_once` because `async` is a reserved keyword. A `StreamData`
/// terminal (here always `Last` or `Error`) never goes through the
/// credit-governed fork, so this never consumes a unit of fan-out credit;
/// it only spawns the one producer task that `parallel` always spawns to
/// drive the action.
pub async fn async_once<T, E, F, Fut>(branch: &Branch, action: F) -> Result<T, BranchError>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut action = Some(action);
    let mut stream = parallel(branch, move || {
        let action = action.take();
        async move {
            match action {
                Some(a) => match a().await {
                    Ok(v) => StreamData::Last(v),
                    Err(e) => StreamData::Error(BranchError::from_action(e)),
                },
                None => StreamData::Done,
            }
        }
    });

    match stream.next().await {
        Some(r) => r,
        None => Err(BranchError::ParentGone),
    }
}
