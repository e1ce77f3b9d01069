//! Property-based tests for the runtime's quantified invariants: credit
//! stays within the pool's starting capacity, credit is fully conserved
//! across a `threads` scope, and the multiset of values delivered to the
//! root matches what the action sequence produced.

use std::future::ready;

use futures::StreamExt;
use proptest::prelude::*;

use forktree::{parallel, threads, StreamData};

async fn run_parallel_over(pool_size: u32, items: Vec<i32>) -> (Vec<i32>, u32) {
    threads(pool_size, move |branch| async move {
        let mut queue = items.into_iter();
        let mut pending_next: Option<i32> = queue.next();

        let stream = parallel(&branch, move || {
            let current = pending_next.take();
            let upcoming = queue.next();
            pending_next = upcoming;
            let event = match current {
                None => StreamData::Done,
                Some(v) if pending_next.is_some() => StreamData::More(v),
                Some(v) => StreamData::Last(v),
            };
            ready(event)
        });

        let mut out = Vec::new();
        let mut stream = stream;
        while let Some(item) = stream.next().await {
            out.push(item.expect("scripted action never fails"));
        }
        (out, branch.available())
    })
    .await
}

proptest! {
    /// The multiset of values observed at the root equals the multiset fed
    /// into the action sequence, for any finite, error-free run.
    #[test]
    fn result_multiset_matches_input(
        pool_size in 0u32..6,
        items in prop::collection::vec(any::<i32>(), 0..12),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (mut out, _) = rt.block_on(run_parallel_over(pool_size, items.clone()));

        let mut expected = items;
        expected.sort();
        out.sort();
        prop_assert_eq!(out, expected);
    }

    /// At scope exit of `threads(n, ..)`, the pool's credit counter equals
    /// `n` again, regardless of how many branches it forked meanwhile.
    #[test]
    fn credit_returns_to_pool_size(
        pool_size in 0u32..6,
        items in prop::collection::vec(any::<i32>(), 0..12),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (_, available) = rt.block_on(run_parallel_over(pool_size, items));

        prop_assert_eq!(available, pool_size);
    }

    /// Across the pool sizes and action lengths exercised above, the pool
    /// never reports more available credit than it started with, nor a
    /// negative amount — `Threads::available` is `CreditHandle::current`
    /// clamped at zero (`src/pool.rs`), so a property test exercising the
    /// compare-exchange loop directly lives in `src/credit.rs`, where that
    /// type is in scope; this end-to-end run is the outer check that
    /// nothing above it can make the pool overshoot its own capacity.
    #[test]
    fn pool_never_overshoots_its_capacity(
        pool_size in 0u32..6,
        items in prop::collection::vec(any::<i32>(), 0..12),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (_, available) = rt.block_on(run_parallel_over(pool_size, items));

        prop_assert!(available <= pool_size);
    }
}
