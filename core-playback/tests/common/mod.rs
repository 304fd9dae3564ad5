//! Scripted media element shared by the integration tests.
//!
//! Unlike the virtual desktop element, nothing here advances on its own:
//! readiness, position and natural end are all driven by the test, unless
//! `auto_ready` is on, in which case every load of a non-empty source is
//! ready (and signalled) immediately.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::media::{MediaElement, MediaSignal, SignalListener};
use core_playback::{PlaybackController, PlayerConfig};
use core_runtime::events::{PlayState, PlayerEvent, TrackIdentity};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct ScriptState {
    source: String,
    paused: bool,
    ready: bool,
    auto_ready: bool,
    position: Duration,
    rejections: Vec<String>,
    calls: Vec<String>,
}

pub struct ScriptedElement {
    state: Mutex<ScriptState>,
    listeners: Mutex<HashMap<MediaSignal, SignalListener>>,
}

impl ScriptedElement {
    /// An element that becomes ready as soon as a source is loaded.
    pub fn auto_ready() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ScriptState {
                paused: true,
                auto_ready: true,
                ..Default::default()
            }),
            listeners: Mutex::new(HashMap::new()),
        })
    }

    /// An element that only becomes ready when the test says so.
    pub fn manual() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ScriptState {
                paused: true,
                ..Default::default()
            }),
            listeners: Mutex::new(HashMap::new()),
        })
    }

    /// Mark the current source buffered and fire `CanPlayThrough`.
    pub fn signal_ready(&self) {
        self.state.lock().unwrap().ready = true;
        self.fire(MediaSignal::CanPlayThrough);
    }

    /// Simulate reaching the natural end of the source.
    pub fn signal_ended(&self) {
        self.state.lock().unwrap().paused = true;
        self.fire(MediaSignal::Ended);
    }

    /// Move the playhead as if playback had advanced.
    pub fn advance_to(&self, position: Duration) {
        self.state.lock().unwrap().position = position;
    }

    /// Queue a rejection for the next `play` call.
    pub fn reject_next_play(&self, reason: &str) {
        self.state.lock().unwrap().rejections.push(reason.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn has_listener(&self, signal: MediaSignal) -> bool {
        self.listeners.lock().unwrap().contains_key(&signal)
    }

    fn fire(&self, signal: MediaSignal) {
        let listener = self.listeners.lock().unwrap().get(&signal).cloned();
        if let Some(listener) = listener {
            listener();
        }
    }

    fn reset_buffer(&self) {
        let signal = {
            let mut state = self.state.lock().unwrap();
            state.paused = true;
            state.ready = state.auto_ready && !state.source.is_empty();
            state.ready
        };
        if signal {
            self.fire(MediaSignal::CanPlayThrough);
        }
    }
}

#[async_trait]
impl MediaElement for ScriptedElement {
    fn set_source(&self, src: &str) {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("set_source:{src}"));
            state.source = src.to_string();
        }
        self.reset_buffer();
    }

    fn source(&self) -> String {
        self.state.lock().unwrap().source.clone()
    }

    fn load(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push("load".to_string());
            state.position = Duration::ZERO;
        }
        self.reset_buffer();
    }

    async fn play(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("play".to_string());
        if !state.rejections.is_empty() {
            let reason = state.rejections.remove(0);
            return Err(BridgeError::PlaybackRejected(reason));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push("pause".to_string());
        state.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn is_ready(&self) -> bool {
        self.state.lock().unwrap().ready
    }

    fn position(&self) -> Duration {
        self.state.lock().unwrap().position
    }

    fn set_position(&self, position: Duration) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("seek:{}", position.as_millis()));
        state.position = position;
    }

    fn set_listener(&self, signal: MediaSignal, listener: Option<SignalListener>) {
        let mut listeners = self.listeners.lock().unwrap();
        match listener {
            Some(listener) => {
                listeners.insert(signal, listener);
            }
            None => {
                listeners.remove(&signal);
            }
        }
    }
}

/// Notifications observed through the controller's listener callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    State(PlayState),
    Track(Option<TrackIdentity>),
}

pub struct Recorder {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Recorder {
    pub fn attach(controller: &PlaybackController) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let states = seen.clone();
        controller.on_state_change(move |state| states.lock().unwrap().push(Seen::State(state)));
        let tracks = seen.clone();
        controller
            .on_track_change(move |track| tracks.lock().unwrap().push(Seen::Track(track.cloned())));
        Self { seen }
    }

    pub fn take(&self) -> Vec<Seen> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }

    pub fn states(&self) -> Vec<PlayState> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter_map(|seen| match seen {
                Seen::State(state) => Some(*state),
                Seen::Track(_) => None,
            })
            .collect()
    }
}

pub fn controller_for(element: &Arc<ScriptedElement>) -> PlaybackController {
    let element: Arc<dyn MediaElement> = element.clone();
    PlaybackController::new(element, PlayerConfig::default()).expect("valid default config")
}

pub fn failures(events: Vec<PlayerEvent>) -> Vec<PlayerEvent> {
    events
        .into_iter()
        .filter(|event| matches!(event, PlayerEvent::PlaybackFailed { .. }))
        .collect()
}
