//! # Playback Controller
//!
//! The single owner of "what is playing" for every consumer sharing one
//! media element.
//!
//! ## State machine
//!
//! ```text
//!            switch(new) / play ok
//!   ┌──────┐ ─────────────────────► ┌─────────┐
//!   │ stop │                        │ playing │
//!   └──────┘ ◄───────────────────── └─────────┘
//!      ▲      end offset, natural      │   ▲
//!      │      end, play failure        │   │ switch(same) / play
//!      │                       pause / │   │
//!      │                  switch(same) ▼   │
//!      │          clear            ┌───────┐
//!      └─────────────────────────── │ pause │
//!                                   └───────┘
//! ```
//!
//! ## Switching
//!
//! [`PlaybackController::switch_track`] does its bookkeeping synchronously:
//! the slot is replaced, the element is pointed at the new resource and
//! `track-change` is emitted before the call returns. The seek and play
//! sequence runs on a spawned task one scheduler tick later, with
//! state-change notifications suppressed until the final outcome is known.
//! Each switch bumps a generation counter, and any deferred work from an
//! older generation stands down, so the last switch always wins.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core_playback::{PlaybackController, PlayerConfig, TrackDescriptor};
//! # use bridge_traits::media::MediaElement;
//! # use std::sync::Arc;
//!
//! # async fn run(element: Arc<dyn MediaElement>) -> core_playback::Result<()> {
//! let player = PlaybackController::shared(|| element, PlayerConfig::default())?;
//! player.on_state_change(|state| println!("now {state}"));
//!
//! let track = TrackDescriptor::new("w1", "https://cdn.example.com/w1.mp3")
//!     .with_start_offset(1_000)
//!     .with_end_offset(6_000);
//! player.switch_track(track).await.ok();
//! # Ok(())
//! # }
//! ```

use crate::binder::MediaResourceBinder;
use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::lifecycle;
use crate::observers::{ListenerId, ListenerRegistry};
use crate::track::TrackDescriptor;
use bridge_traits::media::{MediaElement, MediaSignal};
use core_async::sync::CancellationToken;
use core_async::task::{self, JoinError, JoinHandle};
use core_async::time;
use core_runtime::events::{EventBus, EventStream, PlayState, PlayerEvent, TrackIdentity};
use core_runtime::logging::strip_path;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tracing::{debug, info, instrument, trace, warn};

static SHARED: OnceCell<PlaybackController> = OnceCell::new();

#[derive(Default)]
struct ControllerState {
    play_state: PlayState,
    track: Option<TrackDescriptor>,
    watchdog: Option<CancellationToken>,
    suppress_state_events: bool,
    /// A `play()` for the current generation is waiting on the element.
    starting: bool,
    generation: u64,
}

impl ControllerState {
    fn cancel_watchdog(&mut self) {
        if let Some(token) = self.watchdog.take() {
            token.cancel();
        }
    }
}

struct ControllerInner {
    binder: MediaResourceBinder,
    config: PlayerConfig,
    state: Mutex<ControllerState>,
    state_listeners: ListenerRegistry<PlayState>,
    track_listeners: ListenerRegistry<Option<TrackIdentity>>,
    events: EventBus,
}

/// Completion of a [`PlaybackController::switch_track`] call.
///
/// Resolves once the deferred play sequence (or the toggle) has settled.
/// Requests that were ignored resolve immediately.
#[derive(Debug)]
pub struct SwitchHandle {
    task: Option<JoinHandle<()>>,
}

impl SwitchHandle {
    fn spawned(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    fn settled() -> Self {
        Self { task: None }
    }

    /// Returns true once the switch no longer has pending work.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Future for SwitchHandle {
    type Output = std::result::Result<(), JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.task.as_mut() {
            Some(task) => Pin::new(task).poll(cx),
            None => Poll::Ready(Ok(())),
        }
    }
}

/// Clears the in-flight start flag if a `play()` future is dropped early.
struct StartGuard<'a> {
    inner: &'a ControllerInner,
    generation: u64,
    armed: bool,
}

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.inner.state.lock();
        if state.generation == self.generation {
            state.starting = false;
        }
    }
}

enum SwitchPlan {
    Toggle,
    Load { generation: u64, identity: TrackIdentity },
}

enum WatchdogStep {
    Continue,
    Done,
}

/// Shared playback controller.
///
/// Cloning is cheap; every clone drives the same element and state.
#[derive(Clone)]
pub struct PlaybackController {
    inner: Arc<ControllerInner>,
}

impl PlaybackController {
    /// Build a controller that owns its own lifecycle.
    ///
    /// Installs the element's `Ended` listener and registers the element
    /// for [`lifecycle::shutdown`].
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidConfig`] if `config` fails validation.
    pub fn new(element: Arc<dyn MediaElement>, config: PlayerConfig) -> Result<Self> {
        config.validate().map_err(PlaybackError::InvalidConfig)?;

        lifecycle::register(&element);
        let controller = Self {
            inner: Arc::new(ControllerInner {
                binder: MediaResourceBinder::new(element),
                events: EventBus::new(config.event_buffer_size),
                config,
                state: Mutex::new(ControllerState::default()),
                state_listeners: ListenerRegistry::new(),
                track_listeners: ListenerRegistry::new(),
            }),
        };
        controller.install_ended_listener();

        debug!("playback controller created");
        Ok(controller)
    }

    /// The process-wide controller, built from `make_element` on first use.
    ///
    /// Later calls return the existing instance and ignore both arguments.
    pub fn shared<F>(make_element: F, config: PlayerConfig) -> Result<Self>
    where
        F: FnOnce() -> Arc<dyn MediaElement>,
    {
        SHARED
            .get_or_try_init(|| Self::new(make_element(), config))
            .cloned()
    }

    /// The process-wide controller, if [`PlaybackController::shared`] already built it.
    pub fn try_shared() -> Option<Self> {
        SHARED.get().cloned()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Make `descriptor` the current track and start it, or toggle it if it
    /// already is the current track.
    ///
    /// Invalid descriptors, and switches attempted outside an async
    /// runtime, are logged and ignored. Never panics.
    pub fn switch_track(&self, descriptor: TrackDescriptor) -> SwitchHandle {
        match self.try_switch_track(descriptor) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "ignoring track switch");
                SwitchHandle::settled()
            }
        }
    }

    /// Like [`switch_track`](Self::switch_track) but reports invalid descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidTrack`] if `descriptor` fails validation,
    /// or [`PlaybackError::Internal`] when no async runtime is available to
    /// run the play sequence. Neither case touches the controller.
    pub fn try_switch_track(&self, descriptor: TrackDescriptor) -> Result<SwitchHandle> {
        descriptor.validate()?;
        if !task::has_runtime() {
            return Err(PlaybackError::Internal(
                "track switch needs an async runtime".into(),
            ));
        }

        let plan = {
            let mut state = self.inner.state.lock();
            let same = state
                .track
                .as_ref()
                .is_some_and(|current| current.same_identity(&descriptor));
            if same {
                SwitchPlan::Toggle
            } else {
                let identity = descriptor.identity();
                state.track = Some(descriptor);
                state.cancel_watchdog();
                state.generation += 1;
                state.play_state = PlayState::Stopped;
                state.suppress_state_events = true;
                state.starting = false;
                SwitchPlan::Load {
                    generation: state.generation,
                    identity,
                }
            }
        };

        let (generation, identity) = match plan {
            SwitchPlan::Toggle => return Ok(self.toggle()),
            SwitchPlan::Load {
                generation,
                identity,
            } => (generation, identity),
        };

        info!(
            track_id = %identity.id,
            path = strip_path(&identity.path),
            generation,
            "switching track"
        );
        self.inner.binder.point_to(&identity.path);
        self.notify_track_change(Some(identity));

        let controller = self.clone();
        Ok(SwitchHandle::spawned(task::spawn(async move {
            controller.finish_switch(generation).await;
        })))
    }

    /// Start or resume the current track.
    ///
    /// Waits for the element to become ready (bounded by
    /// [`PlayerConfig::ready_timeout`]) and then starts it. Failures leave
    /// the controller stopped and are reported on the event bus. A call made
    /// while another start of the same track is still pending does nothing.
    #[instrument(skip(self), fields(track_id = tracing::field::Empty))]
    pub async fn play(&self) {
        let (generation, track_id) = {
            let mut state = self.inner.state.lock();
            let Some(track) = state.track.as_ref() else {
                trace!("play ignored, no track loaded");
                return;
            };
            if state.starting {
                trace!("play ignored, already starting");
                return;
            }
            let track_id = track.id.clone();
            state.starting = true;
            (state.generation, track_id)
        };
        let mut start = StartGuard {
            inner: &self.inner,
            generation,
            armed: true,
        };
        tracing::Span::current().record("track_id", track_id.as_str());

        let outcome = self.start_element(generation).await;

        {
            let mut state = self.inner.state.lock();
            if state.generation != generation {
                debug!("dropping play outcome from a superseded track");
                return;
            }
            state.starting = false;
            start.armed = false;
            match outcome {
                Ok(()) => {
                    state.play_state = PlayState::Playing;
                    self.arm_watchdog(&mut state);
                }
                Err(_) => {
                    state.play_state = PlayState::Stopped;
                    state.cancel_watchdog();
                }
            }
        }

        if let Err(err) = &outcome {
            warn!(error = %err, "playback failed, stopping");
            let _ = self.inner.events.emit(PlayerEvent::PlaybackFailed {
                track_id: Some(track_id),
                message: err.to_string(),
                recoverable: err.is_transient(),
            });
        }
        self.notify_state_change();
    }

    /// Pause the current track.
    ///
    /// Does nothing without a loaded track or when the element is already paused.
    pub fn pause(&self) {
        let has_path = self
            .inner
            .state
            .lock()
            .track
            .as_ref()
            .is_some_and(|track| !track.path.is_empty());
        let element = self.inner.binder.element();
        if !has_path || element.is_paused() {
            return;
        }

        element.pause();
        {
            let mut state = self.inner.state.lock();
            state.cancel_watchdog();
            state.play_state = PlayState::Paused;
        }
        self.notify_state_change();
    }

    /// Rewind the current track to its start offset.
    ///
    /// A non-looping track is reloaded and stopped. A looping track keeps
    /// playing from the start offset.
    pub fn reset_audio(&self) {
        let Some(track) = self.current_track() else {
            return;
        };
        let element = self.inner.binder.element();
        let start = track.start_offset();
        element.set_position(start);

        if track.looping {
            let mut state = self.inner.state.lock();
            if state.play_state == PlayState::Playing {
                self.arm_watchdog(&mut state);
            }
            return;
        }

        element.load();
        element.set_position(start);
        {
            let mut state = self.inner.state.lock();
            state.play_state = PlayState::Stopped;
            state.cancel_watchdog();
        }
        debug!(track_id = %track.id, "track reset to start offset");
        self.notify_state_change();
    }

    /// Stop playback and empty the current track slot.
    pub fn clear(&self) {
        let Some(track) = self.current_track() else {
            return;
        };

        let element = self.inner.binder.element();
        element.set_position(track.start_offset());
        element.pause();
        {
            let mut state = self.inner.state.lock();
            state.cancel_watchdog();
            state.play_state = PlayState::Stopped;
            state.track = None;
            state.generation += 1;
            state.suppress_state_events = false;
            state.starting = false;
        }
        self.inner.binder.point_to("");

        info!(track_id = %track.id, "player cleared");
        self.notify_state_change();
        self.notify_track_change(None);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.state() == PlayState::Playing
    }

    pub fn state(&self) -> PlayState {
        self.inner.state.lock().play_state
    }

    pub fn current_track(&self) -> Option<TrackDescriptor> {
        self.inner.state.lock().track.clone()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.inner.config
    }

    /// Whether the end-offset watchdog is currently running.
    pub fn is_watching(&self) -> bool {
        self.inner.state.lock().watchdog.is_some()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Call `listener` with every settled playback state.
    pub fn on_state_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(PlayState) + Send + Sync + 'static,
    {
        self.inner
            .state_listeners
            .subscribe(move |state: &PlayState| listener(*state))
    }

    /// Call `listener` whenever the current track changes. `None` means cleared.
    pub fn on_track_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&TrackIdentity>) + Send + Sync + 'static,
    {
        self.inner
            .track_listeners
            .subscribe(move |track: &Option<TrackIdentity>| listener(track.as_ref()))
    }

    /// Remove a listener added with `on_state_change` or `on_track_change`.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.state_listeners.unsubscribe(id) || self.inner.track_listeners.unsubscribe(id)
    }

    /// Async stream of every notification, including playback failures.
    pub fn events(&self) -> EventStream {
        self.inner.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn toggle(&self) -> SwitchHandle {
        let (playing, pending) = {
            let state = self.inner.state.lock();
            (
                state.play_state == PlayState::Playing,
                state.suppress_state_events || state.starting,
            )
        };
        if pending {
            debug!("toggle ignored, track still starting");
            return SwitchHandle::settled();
        }
        if playing {
            self.pause();
            return SwitchHandle::settled();
        }
        let controller = self.clone();
        SwitchHandle::spawned(task::spawn(async move { controller.play().await }))
    }

    async fn finish_switch(&self, generation: u64) {
        task::yield_now().await;
        if !self.is_current(generation) {
            debug!(generation, "switch superseded before seeking");
            return;
        }

        self.reset_audio();
        {
            let mut state = self.inner.state.lock();
            if state.generation != generation {
                return;
            }
            state.suppress_state_events = false;
        }
        self.play().await;
    }

    async fn start_element(&self, generation: u64) -> Result<()> {
        self.inner
            .binder
            .await_ready(self.inner.config.ready_timeout)
            .await?;
        if !self.is_current(generation) {
            // Readiness belonged to a newer track; its own play call starts it.
            return Ok(());
        }
        self.inner
            .binder
            .element()
            .play()
            .await
            .map_err(PlaybackError::from_play_failure)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.state.lock().generation == generation
    }

    /// Replace the watchdog if the current track needs one. Caller holds the lock.
    fn arm_watchdog(&self, state: &mut ControllerState) {
        state.cancel_watchdog();
        if !state.track.as_ref().is_some_and(TrackDescriptor::needs_watchdog) {
            return;
        }
        if !task::has_runtime() {
            warn!("no async runtime, end offset will not be enforced");
            return;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let generation = state.generation;
        let period = self.inner.config.watchdog_interval;
        let weak = Arc::downgrade(&self.inner);

        task::spawn(async move {
            let mut ticker = time::delayed_interval(period);
            loop {
                core_async::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let Some(inner) = weak.upgrade() else { break };
                let controller = PlaybackController { inner };
                if let WatchdogStep::Done = controller.check_end_offset(generation) {
                    break;
                }
            }
            trace!(generation, "watchdog stopped");
        });

        state.watchdog = Some(token);
    }

    fn check_end_offset(&self, generation: u64) -> WatchdogStep {
        let end = {
            let state = self.inner.state.lock();
            if state.generation != generation || state.play_state != PlayState::Playing {
                return WatchdogStep::Done;
            }
            match state.track.as_ref().and_then(TrackDescriptor::end_offset) {
                Some(end) => end,
                None => return WatchdogStep::Continue,
            }
        };

        let position = self.inner.binder.element().position();
        if position < end {
            return WatchdogStep::Continue;
        }
        debug!(?position, ?end, "end offset reached");
        self.reset_audio();
        WatchdogStep::Done
    }

    fn install_ended_listener(&self) {
        let weak: Weak<ControllerInner> = Arc::downgrade(&self.inner);
        self.inner.binder.element().set_listener(
            MediaSignal::Ended,
            Some(Arc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    PlaybackController { inner }.handle_ended();
                }
            })),
        );
    }

    fn handle_ended(&self) {
        let Some(track) = self.current_track() else {
            return;
        };

        if track.looping {
            if !task::has_runtime() {
                warn!(track_id = %track.id, "no async runtime, cannot restart looping track");
                return;
            }
            debug!(track_id = %track.id, "natural end, looping");
            self.inner.binder.element().set_position(track.start_offset());
            let controller = self.clone();
            task::spawn(async move { controller.play().await });
            return;
        }

        {
            let mut state = self.inner.state.lock();
            state.cancel_watchdog();
            state.play_state = PlayState::Stopped;
        }
        debug!(track_id = %track.id, "natural end");
        self.notify_state_change();
    }

    fn notify_state_change(&self) {
        let state = {
            let state = self.inner.state.lock();
            if state.suppress_state_events {
                trace!(state = %state.play_state, "state change suppressed");
                return;
            }
            state.play_state
        };

        debug!(%state, "state changed");
        self.inner.state_listeners.notify(&state);
        let _ = self.inner.events.emit(PlayerEvent::StateChanged { state });
    }

    fn notify_track_change(&self, track: Option<TrackIdentity>) {
        self.inner.track_listeners.notify(&track);
        let _ = self.inner.events.emit(PlayerEvent::TrackChanged { track });
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("PlaybackController")
            .field("state", &state.play_state)
            .field("track", &state.track.as_ref().map(|t| &t.id))
            .field("generation", &state.generation)
            .field("watching", &state.watchdog.is_some())
            .finish()
    }
}
