//! Workspace placeholder crate.
//!
//! This crate exists to expose one dependency for hosts embedding the
//! player: the playback controller, its event types and logging setup, plus
//! the desktop bridge behind the `desktop-shims` feature. Host applications
//! can depend on `soloplay-workspace` instead of wiring each crate
//! individually.

pub use bridge_traits as bridge;
pub use core_playback as playback;
pub use core_runtime as runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop as desktop;

pub use core_playback::{
    PlayState, PlaybackController, PlaybackError, PlayerConfig, TrackDescriptor, TrackIdentity,
};
