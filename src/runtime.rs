// SPDX-License-Identifier: MPL-2.0

//! Shared async runtime for all network operations.
//!
//! The terminal front end is synchronous; every command runs its requests
//! to completion on this one runtime instead of building a new one per call.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::Runtime;

/// Two workers are plenty for a client that has at most a couple of
/// requests in flight.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("network-async")
        .build()
        .expect("failed to create async runtime")
});

/// Execute a future on the shared runtime, blocking until completion.
pub fn block_on<F: Future>(future: F) -> F::Output {
    RUNTIME.block_on(future)
}

/// Spawn a future on the shared runtime without blocking.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    RUNTIME.spawn(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_and_spawn_share_runtime() {
        let handle = spawn(async { 40 + 2 });
        let value = block_on(async { handle.await.unwrap() });
        assert_eq!(value, 42);
    }
}
