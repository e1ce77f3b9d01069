use std::future::Future;

use crate::branch::Branch;

/// `sync(x)` — forces `x` to run without delegating to a new worker,
/// regardless of available credit, by raising `branch`'s forced-sync
/// override for the duration of `x`. Any `parallel`/`wait_events`/
/// `async_once`/`sample` call made with this same `branch` while `x` is
/// running starts its root context in `Location::RemoteNode`, which
/// `credit_fork` treats as "always run in-line". The override is restored
/// to whatever it was before on every exit path, including a panic inside
/// `x`, via the guard's `Drop`.
pub async fn sync<Fut>(branch: &Branch, x: Fut) -> Fut::Output
where
    Fut: Future,
{
    struct Restore<'a> {
        branch: &'a Branch,
        prev: bool,
    }

    impl Drop for Restore<'_> {
        fn drop(&mut self) {
            self.branch.restore_sync(self.prev);
        }
    }

    let prev = branch.enter_sync();
    let _restore = Restore { branch, prev };
    x.await
}
