//! forktree: a credit-governed concurrent task-tree runtime core.
//!
//! A computation built from the generators in this crate (`parallel`,
//! `wait_events`, `async_once`, `sample`) is a tree of branches: each
//! internal node may fork its continuation into further children, which run
//! on independent Tokio tasks — or in-line, under resource pressure — and
//! whose results stream back toward the root. A shared [`Threads`] pool caps
//! how many branches may run concurrently; `sync` and `threads` let a caller
//! force sequential execution or scope a fresh pool for a sub-computation.
//!
//! The five cooperating pieces (state carried per branch, the continuation
//! runner, the child-event reaper, the credit-governed fork, and the
//! generator surface) are described in detail in this crate's `DESIGN.md`.
//! This module only wires the public surface together; the mechanics live
//! in the modules below.
//!
//! This crate is a library, not a process: it has no CLI, no file or wire
//! format, and does not install a `tracing` subscriber — callers do that.

mod branch;
mod context;
mod credit;
mod error;
mod event;
mod fork;
mod generators;
mod ids;
mod pool;
mod reaper;
mod runner;
mod stream;
mod stream_data;
mod worker;

pub use branch::Branch;
pub use error::BranchError;
pub use generators::{async_once, parallel, sample, sync, threads, wait_events};
pub use pool::Threads;
pub use stream::BranchStream;
pub use stream_data::StreamData;
