use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use futures::Stream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::error::BranchError;
use crate::event::ChildEvent;

/// The sequence a generator hands to the surrounding (out-of-scope)
/// stream-combinator library: one item per leaf value that reached the
/// root, in unspecified order, terminating once the producer and every
/// forked descendant has finished.
///
/// Deliberately minimal — no `map`/`filter`/`fold` live here; callers reach
/// for `futures::StreamExt` for that instead, since this crate implements
/// the runtime core and not a stream-combinator library.
pub struct BranchStream<T> {
    rx: UnboundedReceiver<ChildEvent<T>>,
    buffered: VecDeque<Result<T, BranchError>>,
    // Keeps the producer task alive for the stream's lifetime; dropping the
    // stream drops this and aborts the producer if it is still running.
    _producer: JoinHandle<()>,
}

impl<T> BranchStream<T> {
    pub(crate) fn new(rx: UnboundedReceiver<ChildEvent<T>>, producer: JoinHandle<()>) -> Self {
        BranchStream {
            rx,
            buffered: VecDeque::new(),
            _producer: producer,
        }
    }
}

impl<T> Drop for BranchStream<T> {
    fn drop(&mut self) {
        self._producer.abort();
    }
}

fn flatten<T>(ev: ChildEvent<T>, out: &mut VecDeque<Result<T, BranchError>>) {
    let result = match ev {
        ChildEvent::ChildDone(_, r) => r,
        ChildEvent::PassOnResult(r) => r,
    };
    match result {
        Ok(values) => out.extend(values.into_iter().map(Ok)),
        Err(e) => out.push_back(Err(e)),
    }
}

impl<T: Unpin> Stream for BranchStream<T> {
    type Item = Result<T, BranchError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(item) = this.buffered.pop_front() {
                return Poll::Ready(Some(item));
            }
            match this.rx.poll_recv(cx) {
                Poll::Ready(Some(ev)) => flatten(ev, &mut this.buffered),
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
