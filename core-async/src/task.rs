//! Task spawning and scheduling.
//!
//! The player relies on two scheduling guarantees:
//! - [`spawn`] detaches work from the caller's stack so operations such as a
//!   track switch can return before their deferred steps run.
//! - [`yield_now`] gives up the current turn exactly once, letting side
//!   effects already queued on the runtime settle before continuing.
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         task::yield_now().await;
//!         "done"
//!     });
//!     assert_eq!(handle.await.unwrap(), "done");
//! }
//! ```

pub use tokio::task::{yield_now, AbortHandle, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the ambient runtime.
///
/// # Panics
///
/// Panics when called outside of a runtime context, like `tokio::spawn`.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Returns `true` when the caller is running inside a runtime that can
/// accept [`spawn`] calls.
pub fn has_runtime() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
