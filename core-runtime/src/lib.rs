//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the player crates:
//! - Logging and tracing initialisation
//! - Player event types and the broadcast event bus
//!
//! The playback state machine itself lives in `core-playback`; this crate
//! only defines the vocabulary it speaks (`PlayState`, `TrackIdentity`,
//! `PlayerEvent`) and the plumbing that carries it.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
pub use events::{EventBus, EventStream, PlayState, PlayerEvent, TrackIdentity};
