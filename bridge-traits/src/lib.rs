//! # Host Bridge Traits
//!
//! Contracts between the player core and the host platform.
//!
//! ## Overview
//!
//! The core never touches platform audio APIs or logging backends directly.
//! Each capability it needs is described by a trait here and implemented by
//! the host (or by `bridge-desktop` for desktop defaults):
//!
//! - [`MediaElement`](media::MediaElement) - the single playable element the
//!   player drives (source, load, play, pause, position, signals)
//! - [`LoggerSink`](logging::LoggerSink) - forwards structured logs to the
//!   host logging pipeline
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should map platform failures onto it with actionable messages; a refused
//! play attempt in particular maps to `BridgeError::PlaybackRejected`.
//!
//! ## Thread Safety
//!
//! Bridge objects are shared between the caller, deferred tasks and pollers,
//! so every trait requires [`PlatformSendSync`](platform::PlatformSendSync).

pub mod error;
pub mod logging;
pub mod media;
pub mod platform;

pub use error::BridgeError;

pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaElement, MediaSignal, SignalListener};
