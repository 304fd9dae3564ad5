//! Virtual Media Element
//!
//! A clock-driven [`MediaElement`] for desktop hosts without a native audio
//! node, headless runs and integration tests. It models the parts of a
//! browser `<audio>` element the player core depends on:
//!
//! - loading takes a configurable buffering latency before `CanPlayThrough`
//! - position advances with the runtime clock while playing
//! - reaching the source duration pauses the element and fires `Ended`
//! - a load issued while `play` is pending rejects that play
//!
//! All timing goes through `core_async::time`, so tests running on a paused
//! Tokio clock are fully deterministic.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    media::{MediaElement, MediaSignal, SignalListener},
};
use core_async::sync::watch;
use core_async::task;
use core_async::time::{sleep, Instant};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

/// Timing model for a [`VirtualMediaElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualElementConfig {
    /// Delay between a load and `CanPlayThrough`.
    #[serde(default = "default_buffering_latency")]
    pub buffering_latency: Duration,

    /// Duration of sources without an explicit entry.
    #[serde(default = "default_source_duration")]
    pub default_duration: Duration,
}

impl Default for VirtualElementConfig {
    fn default() -> Self {
        Self {
            buffering_latency: default_buffering_latency(),
            default_duration: default_source_duration(),
        }
    }
}

fn default_buffering_latency() -> Duration {
    Duration::from_millis(50)
}

fn default_source_duration() -> Duration {
    Duration::from_secs(180)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoadStatus {
    generation: u64,
    ready: bool,
}

#[derive(Default)]
struct PlaybackClock {
    source: String,
    duration: Duration,
    /// Position at the moment `playing_since` was taken, or the paused position.
    anchor: Duration,
    playing_since: Option<Instant>,
    load_generation: u64,
    /// Bumped whenever a scheduled `Ended` becomes invalid.
    play_epoch: u64,
    ready: bool,
    rejection: Option<String>,
}

impl PlaybackClock {
    fn position(&self) -> Duration {
        let elapsed = self
            .playing_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        (self.anchor + elapsed).min(self.duration)
    }

    fn freeze(&mut self) {
        self.anchor = self.position();
        self.playing_since = None;
        self.play_epoch += 1;
    }
}

struct ElementInner {
    config: VirtualElementConfig,
    clock: Mutex<PlaybackClock>,
    listeners: Mutex<HashMap<MediaSignal, SignalListener>>,
    durations: Mutex<HashMap<String, Duration>>,
    load_status: watch::Sender<LoadStatus>,
    play_calls: Mutex<usize>,
}

impl ElementInner {
    fn fire(&self, signal: MediaSignal) {
        let listener = self.listeners.lock().get(&signal).cloned();
        if let Some(listener) = listener {
            trace!(%signal, "firing media signal");
            listener();
        }
    }

    fn duration_of(&self, source: &str) -> Duration {
        self.durations
            .lock()
            .get(source)
            .copied()
            .unwrap_or(self.config.default_duration)
    }
}

/// Simulated audio element driven by the async runtime clock.
#[derive(Clone)]
pub struct VirtualMediaElement {
    inner: Arc<ElementInner>,
}

impl VirtualMediaElement {
    pub fn new() -> Self {
        Self::with_config(VirtualElementConfig::default())
    }

    pub fn with_config(config: VirtualElementConfig) -> Self {
        let (load_status, _) = watch::channel(LoadStatus {
            generation: 0,
            ready: false,
        });
        Self {
            inner: Arc::new(ElementInner {
                config,
                clock: Mutex::new(PlaybackClock::default()),
                listeners: Mutex::new(HashMap::new()),
                durations: Mutex::new(HashMap::new()),
                load_status,
                play_calls: Mutex::new(0),
            }),
        }
    }

    /// Give `source` a specific duration instead of the configured default.
    pub fn set_source_duration(&self, source: impl Into<String>, duration: Duration) {
        self.inner.durations.lock().insert(source.into(), duration);
    }

    /// Make the next `play` call fail with `reason`.
    pub fn reject_next_play(&self, reason: impl Into<String>) {
        self.inner.clock.lock().rejection = Some(reason.into());
    }

    /// Duration of the current source.
    pub fn duration(&self) -> Duration {
        self.inner.clock.lock().duration
    }

    /// Number of `play` calls received so far.
    pub fn play_calls(&self) -> usize {
        *self.inner.play_calls.lock()
    }

    /// Whether a listener is installed for `signal`.
    pub fn has_listener(&self, signal: MediaSignal) -> bool {
        self.inner.listeners.lock().contains_key(&signal)
    }

    fn begin_load(&self) {
        let (generation, source) = {
            let mut clock = self.inner.clock.lock();
            clock.freeze();
            clock.anchor = Duration::ZERO;
            clock.ready = false;
            clock.load_generation += 1;
            clock.duration = self.inner.duration_of(&clock.source);
            self.inner.load_status.send_replace(LoadStatus {
                generation: clock.load_generation,
                ready: false,
            });
            (clock.load_generation, clock.source.clone())
        };

        if source.is_empty() {
            return;
        }
        debug!(generation, source = %source, "virtual element loading");

        if !task::has_runtime() {
            Self::finish_load(&self.inner, generation);
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let latency = self.inner.config.buffering_latency;
        task::spawn(async move {
            sleep(latency).await;
            if let Some(inner) = weak.upgrade() {
                Self::finish_load(&inner, generation);
            }
        });
    }

    fn finish_load(inner: &ElementInner, generation: u64) {
        {
            let mut clock = inner.clock.lock();
            if clock.load_generation != generation {
                return;
            }
            clock.ready = true;
            inner.load_status.send_replace(LoadStatus {
                generation,
                ready: true,
            });
        }
        inner.fire(MediaSignal::CanPlayThrough);
    }

    /// Schedule `Ended` for the current play epoch. Caller holds the clock lock.
    fn schedule_end(inner: &Arc<ElementInner>, clock: &PlaybackClock) {
        if !task::has_runtime() {
            return;
        }
        let remaining = clock.duration.saturating_sub(clock.anchor);
        let epoch = clock.play_epoch;
        let weak: Weak<ElementInner> = Arc::downgrade(inner);

        task::spawn(async move {
            sleep(remaining).await;
            let Some(inner) = weak.upgrade() else { return };
            {
                let mut clock = inner.clock.lock();
                if clock.play_epoch != epoch || clock.playing_since.is_none() {
                    return;
                }
                clock.freeze();
                clock.anchor = clock.duration;
            }
            debug!("virtual element reached natural end");
            inner.fire(MediaSignal::Ended);
        });
    }

    async fn wait_until_ready(&self) -> Result<()> {
        let mut status = self.inner.load_status.subscribe();
        let generation = self.inner.clock.lock().load_generation;
        loop {
            let current = *status.borrow_and_update();
            if current.generation != generation {
                return Err(BridgeError::PlaybackRejected(
                    "play interrupted by a new load".into(),
                ));
            }
            if current.ready {
                return Ok(());
            }
            status
                .changed()
                .await
                .map_err(|_| BridgeError::OperationFailed("element dropped".into()))?;
        }
    }
}

impl Default for VirtualMediaElement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaElement for VirtualMediaElement {
    fn set_source(&self, src: &str) {
        self.inner.clock.lock().source = src.to_string();
        self.begin_load();
    }

    fn source(&self) -> String {
        self.inner.clock.lock().source.clone()
    }

    fn load(&self) {
        self.begin_load();
    }

    async fn play(&self) -> Result<()> {
        *self.inner.play_calls.lock() += 1;
        {
            let mut clock = self.inner.clock.lock();
            if clock.source.is_empty() {
                return Err(BridgeError::PlaybackRejected("no source assigned".into()));
            }
            if let Some(reason) = clock.rejection.take() {
                return Err(BridgeError::PlaybackRejected(reason));
            }
        }

        self.wait_until_ready().await?;

        let mut clock = self.inner.clock.lock();
        if clock.playing_since.is_some() {
            return Ok(());
        }
        if clock.anchor >= clock.duration {
            clock.anchor = Duration::ZERO;
        }
        clock.play_epoch += 1;
        clock.playing_since = Some(Instant::now());
        Self::schedule_end(&self.inner, &clock);
        Ok(())
    }

    fn pause(&self) {
        let mut clock = self.inner.clock.lock();
        if clock.playing_since.is_some() {
            clock.freeze();
        }
    }

    fn is_paused(&self) -> bool {
        self.inner.clock.lock().playing_since.is_none()
    }

    fn is_ready(&self) -> bool {
        self.inner.clock.lock().ready
    }

    fn position(&self) -> Duration {
        self.inner.clock.lock().position()
    }

    fn set_position(&self, position: Duration) {
        let mut clock = self.inner.clock.lock();
        let playing = clock.playing_since.is_some();
        clock.freeze();
        clock.anchor = position.min(clock.duration);
        if playing {
            clock.playing_since = Some(Instant::now());
            Self::schedule_end(&self.inner, &clock);
        }
    }

    fn set_listener(&self, signal: MediaSignal, listener: Option<SignalListener>) {
        let mut listeners = self.inner.listeners.lock();
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

impl fmt::Debug for VirtualMediaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.inner.clock.lock();
        f.debug_struct("VirtualMediaElement")
            .field("source", &clock.source)
            .field("position", &clock.position())
            .field("playing", &clock.playing_since.is_some())
            .field("ready", &clock.ready)
            .finish()
    }
}
