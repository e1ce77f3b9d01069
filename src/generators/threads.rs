use std::future::Future;

use crate::branch::Branch;
use crate::pool::Threads;

/// `threads(n, x)` — scopes a fresh credit pool of size `n` to `x`.
/// The source swaps a fresh `CreditHandle` into the ambient context for the
/// duration of `x` and restores the enclosing one on exit; Rust has no
/// ambient state to swap, so the fresh `Branch` is handed to `x` explicitly
/// instead of installed behind the scenes. Generator calls inside `x` that
/// use this branch (not whatever branch the caller itself runs under) are
/// bounded by `n`; there is nothing to restore afterward because nothing
/// outside `x` was ever mutated. `n = 0` starves every nested `parallel`
/// into the sync fallback, making the whole scope strictly sequential.
pub async fn threads<F, Fut, T>(n: u32, x: F) -> T
where
    F: FnOnce(Branch) -> Fut,
    Fut: Future<Output = T>,
{
    x(Branch::new(Threads::new(n))).await
}
