//! Media element bridge.
//!
//! The player core never creates or owns audio output itself. The host
//! supplies one playable element (an HTML `<audio>` node, a native media
//! session, a simulated element in tests) through the [`MediaElement`]
//! trait, and the core drives it exclusively through the primitives below.
//!
//! ## Signals
//!
//! Elements report two asynchronous conditions:
//!
//! - [`MediaSignal::CanPlayThrough`]: enough of the current source has
//!   buffered to play without stalling.
//! - [`MediaSignal::Ended`]: playback reached the natural end of the source.
//!
//! Each signal has a single listener slot. Installing a listener replaces the
//! previous one, and installing `None` removes it, so repeated registrations
//! never accumulate.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::media::{MediaElement, MediaSignal};
//! use std::sync::Arc;
//!
//! async fn start(element: Arc<dyn MediaElement>) {
//!     element.set_listener(
//!         MediaSignal::Ended,
//!         Some(Arc::new(|| tracing::info!("track ended"))),
//!     );
//!     element.set_source("https://cdn.example.com/a.mp3");
//!     element.play().await.ok();
//! }
//! ```

use crate::{error::Result, platform::PlatformSendSync};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Asynchronous conditions reported by a [`MediaElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSignal {
    /// Enough data is buffered to play through without stalling.
    CanPlayThrough,
    /// Playback reached the natural end of the source.
    Ended,
}

impl fmt::Display for MediaSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSignal::CanPlayThrough => f.write_str("canplaythrough"),
            MediaSignal::Ended => f.write_str("ended"),
        }
    }
}

/// Callback invoked when a [`MediaSignal`] fires.
pub type SignalListener = Arc<dyn Fn() + Send + Sync>;

/// A single playable element supplied by the host.
///
/// ## Contract
///
/// - `set_source` and `load` discard any buffered data; `is_ready` reports
///   `false` until the next `CanPlayThrough` for the new data.
/// - `play` resolves once playback actually started and rejects with
///   [`BridgeError::PlaybackRejected`](crate::error::BridgeError::PlaybackRejected)
///   when the host refuses. A `load` issued while a `play` is pending must
///   reject that pending attempt.
/// - Listeners must be invoked without holding internal locks; a listener
///   may call back into the element.
#[async_trait::async_trait]
pub trait MediaElement: PlatformSendSync {
    /// Point the element at a new source. An empty string clears it.
    fn set_source(&self, src: &str);

    /// The source currently assigned, or an empty string.
    fn source(&self) -> String;

    /// Reset the element and start (re)loading the current source.
    fn load(&self);

    /// Attempt to start playback.
    async fn play(&self) -> Result<()>;

    /// Pause playback, keeping the position.
    fn pause(&self);

    /// Whether the element is currently paused (or was never started).
    fn is_paused(&self) -> bool;

    /// Whether enough data is buffered to play through.
    fn is_ready(&self) -> bool;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Seek to an absolute position.
    fn set_position(&self, position: Duration);

    /// Install or remove the listener for `signal`, replacing any previous
    /// listener for that signal.
    fn set_listener(&self, signal: MediaSignal, listener: Option<SignalListener>);
}
