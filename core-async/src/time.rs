//! Time-related abstractions.
//!
//! Thin re-exports of `tokio::time` so timers used by the player (readiness
//! timeouts, the end-offset watchdog) honour Tokio's paused clock in tests.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, timeout, Duration};
//!
//! async fn example() {
//!     let result = timeout(Duration::from_millis(50), sleep(Duration::from_secs(1))).await;
//!     assert!(result.is_err());
//! }
//! ```

pub use tokio::time::{
    error::Elapsed, interval, sleep, sleep_until, timeout, Interval, MissedTickBehavior, Sleep,
    Timeout,
};

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};
pub use tokio::time::Instant;

/// Builds an interval whose first tick fires after one `period` instead of
/// immediately, and which skips missed ticks rather than bursting.
///
/// Pollers use this so a freshly armed poll never runs in the same turn that
/// armed it.
pub fn delayed_interval(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Returns the current time as milliseconds since UNIX_EPOCH.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
