//! End-to-end scenarios from the specification's testable-properties section:
//! each test below corresponds to one of the six literal scenarios.

use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::Mutex;

use forktree::{async_once, parallel, sample, threads, Branch, StreamData, Threads};

/// Installs a `tracing` subscriber for the duration of the test binary so a
/// failing cancellation/drain scenario can be re-run with `-- --nocapture`
/// to see fork/credit/cancel events in order. Defaults to `trace` for this
/// crate but honours `RUST_LOG` if set. Only the first call across this
/// binary's tests actually installs one; later calls are harmless no-ops.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("forktree=trace"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// An `action` that replays a fixed, pre-scripted sequence of `StreamData`
/// events, one per call, then `Done` forever after.
fn scripted<T: Send + 'static>(events: Vec<StreamData<T>>) -> impl FnMut() -> Ready<StreamData<T>> {
    let mut queue: VecDeque<StreamData<T>> = events.into();
    move || ready(queue.pop_front().unwrap_or(StreamData::Done))
}

async fn collect<T: Send + Unpin + 'static>(mut stream: forktree::BranchStream<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Some(item) = stream.next().await {
        out.push(item.expect("scenario streams carry no branch error"));
    }
    out
}

/// Scenario 1: `threads(4, parallel(action))`, action yields
/// `More 1, More 2, Last 3`; downstream collects to a list. The list must be
/// a permutation of `[1, 2, 3]`, and the credit counter must return to 4.
#[tokio::test]
async fn scenario_1_threads_4_permutes_and_restores_credit() {
    let values = threads(4, |branch| async move {
        let stream = parallel(
            &branch,
            scripted(vec![StreamData::More(1), StreamData::More(2), StreamData::Last(3)]),
        );
        let out = collect(stream).await;
        assert_eq!(branch.available(), 4, "credit must return to its starting size");
        out
    })
    .await;

    let mut sorted = values;
    sorted.sort();
    assert_eq!(sorted, vec![1, 2, 3]);
}

/// Scenario 2: `threads(0, parallel(action))`, same action. With zero
/// credit every fork falls back to in-line execution, so the result
/// preserves the action's own order exactly.
#[tokio::test]
async fn scenario_2_threads_0_is_strictly_sequential() {
    let values = threads(0, |branch| async move {
        let stream = parallel(
            &branch,
            scripted(vec![StreamData::More(1), StreamData::More(2), StreamData::Last(3)]),
        );
        let out = collect(stream).await;
        assert_eq!(branch.available(), 0);
        out
    })
    .await;

    assert_eq!(values, vec![1, 2, 3]);
}

/// Scenario 3: `threads(2, parallel(action))`, action yields
/// `More 1, More 2, More 3, Last 4`; downstream sums. Sum must be 10 and
/// credit must return to 2.
#[tokio::test]
async fn scenario_3_threads_2_sum_is_ten() {
    let sum = threads(2, |branch| async move {
        let stream = parallel(
            &branch,
            scripted(vec![
                StreamData::More(1),
                StreamData::More(2),
                StreamData::More(3),
                StreamData::Last(4),
            ]),
        );
        let out = collect(stream).await;
        assert_eq!(branch.available(), 2);
        out.into_iter().sum::<i32>()
    })
    .await;

    assert_eq!(sum, 10);
}

/// Scenario 4: `async(io1) ⊕ async(io2)` where `io1` raises an error. The
/// root observes the error; `io2`'s branch, if started, is cancelled; the
/// pool's credit is left untouched by the race (terminal `async_once`
/// items never consume fork credit — see `generators::async_once`).
#[tokio::test]
async fn scenario_4_race_surfaces_first_error_and_restores_credit() {
    init_tracing();
    let threads = Threads::new(2);
    let branch = Branch::new(threads);

    let fails = async_once(&branch, || async {
        Err::<i32, _>(std::io::Error::other("boom"))
    });
    let never_completes = async_once(&branch, || async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok::<i32, std::io::Error>(99)
    });

    let outcome = match futures::future::select(Box::pin(fails), Box::pin(never_completes)).await {
        futures::future::Either::Left((r, _slower)) => r,
        futures::future::Either::Right((r, _slower)) => r,
    };

    assert!(outcome.is_err(), "the race must surface the raised error");
    // Let the loser's aborted producer task actually unwind.
    tokio::task::yield_now().await;
    assert_eq!(branch.available(), 2, "credit is untouched by a losing async_once");
}

/// Scenario 5: `sample(clock, 10ms)` where `clock` returns `1, 1, 2, 2, 3`
/// on successive calls. Downstream sequence: initial `1`, then `2`, then
/// `3` — consecutive duplicates filtered out.
#[tokio::test]
async fn scenario_5_sample_filters_consecutive_duplicates() {
    let threads = Threads::new(4);
    let branch = Branch::new(threads);

    let remaining = Arc::new(Mutex::new(VecDeque::from(vec![1, 1, 2, 2, 3])));
    let clock = move || {
        let remaining = remaining.clone();
        async move {
            let mut guard = remaining.lock().await;
            let v = guard.pop_front().unwrap_or(3);
            Ok::<i32, std::io::Error>(v)
        }
    };

    let mut stream = sample(&branch, clock, Duration::from_millis(5));
    let mut seen = Vec::new();
    for _ in 0..3 {
        let item = stream.next().await.expect("sample never terminates on its own");
        seen.push(item.expect("the scripted clock never fails"));
    }

    assert_eq!(seen, vec![1, 2, 3]);
}

/// Scenario 6: `threads(1, parallel(action))`, action yields 100 `More`
/// events, downstream is `take(10)`. Exactly 10 values reach the sink, and
/// the credit scope unwinds cleanly once the stream is dropped.
#[tokio::test]
async fn scenario_6_take_ten_unwinds_cleanly() {
    init_tracing();
    let threads = Threads::new(1);
    let branch = Branch::new(threads.clone());

    let mut action_state = 0i32;
    let stream = parallel(&branch, move || {
        action_state += 1;
        let v = action_state;
        ready(if v <= 100 { StreamData::More(v) } else { StreamData::Done })
    });

    let taken: Vec<i32> = tokio::time::timeout(
        Duration::from_secs(5),
        stream.take(10).map(|r| r.expect("no branch error expected")).collect(),
    )
    .await
    .expect("take(10) must not hang");

    assert_eq!(taken.len(), 10);

    // Give whatever forked child was mid-flight when the stream was dropped
    // a chance to finish its (trivial, non-blocking) leaf body and release
    // its credit back to the pool.
    for _ in 0..50 {
        if branch.available() == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(branch.available(), 1, "credit must unwind back to the pool size");
}
