//! Shared async runtime for the engine crates.
//!
//! Every context actor, aggregator actor and timer runs on one process-wide
//! multi-thread runtime, so callers never need to own a runtime of their own.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

pub mod timer;
pub mod tokio_actor;

fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        Builder::new_multi_thread()
            .enable_all()
            .thread_name("autovolume-runtime")
            .build()
            .expect("failed to build shared tokio runtime")
    })
}

pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    runtime().spawn(future)
}

/// Drives `future` to completion on the shared runtime.
///
/// Must not be called from inside a runtime worker thread.
pub fn block_on<F: Future>(future: F) -> F::Output {
    runtime().block_on(future)
}
