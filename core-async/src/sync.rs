//! Synchronization primitives.
//!
//! Async-aware channels and locks from `tokio::sync`, plus the
//! cancellation token from `tokio-util` used to stop background pollers.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{oneshot, CancellationToken};
//!
//! async fn example() {
//!     let (tx, rx) = oneshot::channel();
//!     tx.send(7).unwrap();
//!     assert_eq!(rx.await.unwrap(), 7);
//!
//!     let token = CancellationToken::new();
//!     token.cancel();
//!     token.cancelled().await;
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::{CancellationToken, DropGuard};
