mod async_once;
mod parallel;
mod sample;
mod sync;
mod threads;
mod wait_events;

pub use async_once::async_once;
pub use parallel::parallel;
pub use sample::sample;
pub use sync::sync;
pub use threads::threads;
pub use wait_events::wait_events;

use std::sync::Arc;

use crate::context::{BoxFuture, Continuation};

/// The body shared by every branch this crate's generators fork: a
/// surrounding stream-combinator library would normally run here; without
/// one, a resumed branch's job is simply to deliver its mailbox value up
/// as its one leaf result.
pub(crate) fn leaf<T: Send + 'static>() -> Continuation<T> {
    Arc::new(|ctx| -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Some(v) = ctx.mailbox.take_resumed() {
                ctx.accum.push(v);
            }
        })
    })
}
