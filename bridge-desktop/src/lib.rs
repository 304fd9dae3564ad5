//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `VirtualMediaElement`: a clock-driven `MediaElement` with buffering
//!   latency, advancing position and natural end, for hosts without a
//!   native audio node and for integration tests
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::VirtualMediaElement;
//! use core_playback::{PlaybackController, PlayerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let player = PlaybackController::new(
//!         Arc::new(VirtualMediaElement::new()),
//!         PlayerConfig::default(),
//!     )
//!     .unwrap();
//! }
//! ```

mod media;

pub use media::{VirtualElementConfig, VirtualMediaElement};
