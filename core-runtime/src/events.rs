//! # Player Event Types and Event Bus
//!
//! Typed notifications emitted by the player core, plus a broadcast bus so
//! any number of asynchronous consumers can follow them.
//!
//! ## Overview
//!
//! - **Event Types**: [`PlayState`], [`TrackIdentity`] and the [`PlayerEvent`]
//!   envelope
//! - **EventBus**: `tokio::sync::broadcast` wrapper for publishing events
//! - **EventStream**: receiver wrapper with optional filtering
//!
//! ```text
//! ┌──────────────────┐   emit    ┌──────────┐  subscribe  ┌──────────────┐
//! │PlaybackController├──────────>│ EventBus ├────────────>│ UI binding A │
//! └──────────────────┘           │          ├────────────>│ UI binding B │
//!                                └──────────┘             └──────────────┘
//! ```
//!
//! Synchronous UI bindings usually prefer the controller's listener
//! registry; the bus serves consumers living in their own tasks.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, PlayState, PlayerEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(PlayerEvent::StateChanged { state: PlayState::Playing }).ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event, PlayerEvent::StateChanged { state: PlayState::Playing });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell `n` events behind. Not
//!   fatal; the next `recv` returns the oldest retained event.
//! - **`RecvError::Closed`**: every sender was dropped; treat as shutdown.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Payloads
// ============================================================================

/// Playback state of the shared element.
///
/// Serialised with the wire names UI bindings already understand:
/// `"stop"`, `"pause"` and `"playing"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    #[default]
    #[serde(rename = "stop")]
    Stopped,
    #[serde(rename = "pause")]
    Paused,
    #[serde(rename = "playing")]
    Playing,
}

impl PlayState {
    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayState::Stopped => "stop",
            PlayState::Paused => "pause",
            PlayState::Playing => "playing",
        }
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a track: two tracks with equal `id` and `path` are the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackIdentity {
    pub id: String,
    pub path: String,
}

impl TrackIdentity {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

// ============================================================================
// Player Events
// ============================================================================

/// Events published by the player core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum PlayerEvent {
    /// Playback state settled on a new value.
    StateChanged { state: PlayState },
    /// The current track slot changed. `None` means the slot was cleared.
    TrackChanged { track: Option<TrackIdentity> },
    /// A play attempt failed and the player fell back to `stop`.
    PlaybackFailed {
        track_id: Option<String>,
        message: String,
        /// Whether retrying the same track may succeed.
        recoverable: bool,
    },
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::StateChanged { state } => match state {
                PlayState::Stopped => "Playback stopped",
                PlayState::Paused => "Playback paused",
                PlayState::Playing => "Playback started",
            },
            PlayerEvent::TrackChanged { track: Some(_) } => "Track changed",
            PlayerEvent::TrackChanged { track: None } => "Track cleared",
            PlayerEvent::PlaybackFailed { .. } => "Playback failed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::PlaybackFailed { .. } => EventSeverity::Warning,
            PlayerEvent::TrackChanged { .. } => EventSeverity::Info,
            PlayerEvent::StateChanged { .. } => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast bus for [`PlayerEvent`]s.
///
/// Cloning the bus yields another handle on the same channel. Events are
/// cloned for every subscriber; subscribers that fall behind by more than the
/// capacity receive `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when nobody is listening.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.sender.subscribe())
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, PlayerEvent};
///
/// let bus = EventBus::new(16);
/// let tracks_only = bus
///     .subscribe()
///     .filter(|event| matches!(event, PlayerEvent::TrackChanged { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, `RecvError::Closed` once all senders are gone.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching events are currently queued.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every matching event currently queued.
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
