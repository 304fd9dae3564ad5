//! # Media Resource Binder
//!
//! Points the shared element at a resource and turns its one-shot
//! `CanPlayThrough` signal into an awaitable, bounded wait.
//!
//! ## Readiness waits
//!
//! Every [`MediaResourceBinder::await_ready`] call queues a waiter tagged
//! with its own generation. A readiness signal resolves every queued waiter
//! at once. A wait that times out removes only its own entry, so an old
//! wait timing out can never fail a newer one for a different resource.
//!
//! ```text
//!   await_ready(g1) ─┐
//!   await_ready(g2) ─┼──► pending [(g1, tx), (g2, tx)] ──CanPlayThrough──► all resolved
//!   timeout(g1) ─────┘         removes (g1, tx) only
//! ```

use crate::error::{PlaybackError, Result};
use bridge_traits::media::{MediaElement, MediaSignal};
use core_async::sync::oneshot;
use core_async::time;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Default)]
struct ReadyWaiters {
    next_generation: u64,
    pending: Vec<(u64, oneshot::Sender<()>)>,
}

impl ReadyWaiters {
    fn enqueue(&mut self, sender: oneshot::Sender<()>) -> u64 {
        self.next_generation += 1;
        self.pending.push((self.next_generation, sender));
        self.next_generation
    }

    /// Remove the waiter for `generation`. Returns `false` if it was already resolved.
    fn retire(&mut self, generation: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(g, _)| *g != generation);
        self.pending.len() != before
    }
}

fn resolve_all(waiters: &Mutex<ReadyWaiters>) {
    let pending = std::mem::take(&mut waiters.lock().pending);
    if !pending.is_empty() {
        trace!(count = pending.len(), "resolving readiness waiters");
    }
    for (_, sender) in pending {
        // The receiver may already be gone after a timeout.
        let _ = sender.send(());
    }
}

/// Owns the element reference used for loading and readiness.
pub struct MediaResourceBinder {
    element: Arc<dyn MediaElement>,
    waiters: Arc<Mutex<ReadyWaiters>>,
}

impl MediaResourceBinder {
    pub fn new(element: Arc<dyn MediaElement>) -> Self {
        Self {
            element,
            waiters: Arc::new(Mutex::new(ReadyWaiters::default())),
        }
    }

    pub fn element(&self) -> &Arc<dyn MediaElement> {
        &self.element
    }

    /// Point the element at `path`. An empty path clears the source.
    pub fn point_to(&self, path: &str) {
        self.element.set_position(Duration::ZERO);
        self.element.load();
        self.element.set_source(path);
    }

    /// Wait until the element can play through its current source.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::ResourceLoadTimeout`] if no readiness signal
    ///   arrives within `timeout`.
    /// - [`PlaybackError::WaitAbandoned`] if the binder was dropped while
    ///   waiting.
    pub async fn await_ready(&self, timeout: Duration) -> Result<()> {
        let (sender, receiver) = oneshot::channel();
        let generation = self.waiters.lock().enqueue(sender);

        self.attach_ready_listener();
        if self.element.is_ready() {
            resolve_all(&self.waiters);
        }

        match time::timeout(timeout, receiver).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(PlaybackError::WaitAbandoned),
            Err(_) => {
                if self.waiters.lock().retire(generation) {
                    debug!(generation, ?timeout, "readiness wait timed out");
                    Err(PlaybackError::ResourceLoadTimeout(timeout))
                } else {
                    // Resolved in the same instant the deadline fired.
                    Ok(())
                }
            }
        }
    }

    /// Number of readiness waits still outstanding.
    pub fn pending_waiters(&self) -> usize {
        self.waiters.lock().pending.len()
    }

    fn attach_ready_listener(&self) {
        let waiters: Weak<Mutex<ReadyWaiters>> = Arc::downgrade(&self.waiters);
        self.element.set_listener(MediaSignal::CanPlayThrough, None);
        self.element.set_listener(
            MediaSignal::CanPlayThrough,
            Some(Arc::new(move || {
                if let Some(waiters) = waiters.upgrade() {
                    resolve_all(&waiters);
                }
            })),
        );
    }
}

impl fmt::Debug for MediaResourceBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaResourceBinder")
            .field("pending_waiters", &self.pending_waiters())
            .finish()
    }
}
