use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::branch::Branch;
use crate::error::BranchError;
use crate::stream::BranchStream;
use crate::stream_data::StreamData;

use super::parallel::parallel;

struct SampleState<F, T> {
    action: F,
    prev: Option<T>,
    first: bool,
}

/// `sample(action, interval)` — the initial value immediately, then
/// the result of polling `action` every `interval`, filtered to emit only
/// when it differs from the previous one. Conceptually this is
/// `waitEvents(pollLoop)` merged with a one-shot initial value through an
/// alternative combinator, but this crate has no public combinator surface
/// on `BranchStream` to compose that way — callers reach for
/// `futures::StreamExt`/`futures::stream::select` over the results, not
/// over a generator's internals — so the initial-then-poll-and-filter loop
/// is written directly as the one `action` a single `parallel` call
/// drives, rather than as two merged generators. The `prev` cell lives in
/// `SampleState`, one per branch, tracking the last emitted value.
pub fn sample<T, E, F, Fut>(branch: &Branch, action: F, interval: Duration) -> BranchStream<T>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + Clone + PartialEq + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = Arc::new(Mutex::new(SampleState {
        action,
        prev: None,
        first: true,
    }));

    parallel(branch, move || {
        let state = state.clone();
        async move {
            let mut state = state.lock().await;
            loop {
                if state.first {
                    state.first = false;
                    return match (state.action)().await {
                        Ok(v) => {
                            state.prev = Some(v.clone());
                            StreamData::More(v)
                        }
                        Err(e) => StreamData::Error(BranchError::from_action(e)),
                    };
                }
                tokio::time::sleep(interval).await;
                match (state.action)().await {
                    Ok(v) => {
                        if state.prev.as_ref() == Some(&v) {
                            continue;
                        }
                        state.prev = Some(v.clone());
                        return StreamData::More(v);
                    }
                    Err(e) => return StreamData::Error(BranchError::from_action(e)),
                }
            }
        }
    })
}
