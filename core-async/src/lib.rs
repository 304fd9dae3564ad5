//! Runtime facade for the player core.
//!
//! Every other crate in the workspace goes through this crate for spawning,
//! timers and synchronization instead of naming Tokio directly. Keeping the
//! executor behind one seam means a host embedding the player only has to
//! satisfy one set of runtime requirements.
//!
//! # Modules
//!
//! - `task`: spawning and cooperative yielding
//! - `time`: sleep, timeout and interval timers
//! - `sync`: channels, locks and cancellation tokens
//! - `runtime`: blocking entry points for synchronous hosts
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::{spawn, yield_now};
pub use time::{sleep, Duration, Instant};

/// Waits on several futures at once, running the branch of whichever
/// completes first. Re-exported so downstream crates never need Tokio in
/// their manifests.
pub use tokio::select;
