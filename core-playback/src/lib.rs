//! # Playback Core
//!
//! Drives one shared media element on behalf of any number of UI consumers.
//!
//! ## Overview
//!
//! This crate handles:
//! - Switching, toggling and clearing the single current track
//! - Bounded readiness waits on the host element
//! - Start/end offsets within a resource, with optional looping
//! - Fan-out of settled state and track changes to listeners and async streams
//! - Process-wide teardown of every registered element
//!
//! The host supplies the element through
//! [`bridge_traits::media::MediaElement`]; nothing here produces audio.

pub mod binder;
pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod observers;
pub mod track;

pub use binder::MediaResourceBinder;
pub use config::PlayerConfig;
pub use controller::{PlaybackController, SwitchHandle};
pub use core_runtime::events::{PlayState, PlayerEvent, TrackIdentity};
pub use error::{PlaybackError, Result};
pub use observers::{ListenerId, ListenerRegistry};
pub use track::TrackDescriptor;
