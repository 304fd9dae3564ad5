//! Runtime entry points for synchronous hosts.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// Hosts without their own executor use this to drive one-off async calls
/// such as flushing a log sink during shutdown.
///
/// # Panics
///
/// Panics if the runtime cannot be built or if called from within another
/// runtime's worker thread.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}
