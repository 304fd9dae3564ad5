//! Process-wide teardown.
//!
//! Each controller registers its element here once, at construction. Only
//! weak handles are kept, so registration never extends an element's life.
//! Hosts call [`shutdown`] when the process is about to exit so that no
//! element keeps sounding after its owner is gone.

use bridge_traits::media::MediaElement;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

static ELEMENTS: Lazy<Mutex<Vec<Weak<dyn MediaElement>>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Track `element` for teardown. Registering the same element twice is a no-op.
pub(crate) fn register(element: &Arc<dyn MediaElement>) {
    let handle = Arc::downgrade(element);
    let mut elements = ELEMENTS.lock();
    elements.retain(|existing| existing.strong_count() > 0);
    if elements.iter().any(|existing| existing.ptr_eq(&handle)) {
        return;
    }
    elements.push(handle);
    debug!(registered = elements.len(), "media element registered for teardown");
}

/// Number of registered elements that are still alive.
pub fn registered_count() -> usize {
    ELEMENTS
        .lock()
        .iter()
        .filter(|element| element.strong_count() > 0)
        .count()
}

/// Pause every live element that is still playing.
///
/// Returns how many elements were paused.
pub fn shutdown() -> usize {
    let live: Vec<Arc<dyn MediaElement>> = {
        let mut elements = ELEMENTS.lock();
        elements.retain(|existing| existing.strong_count() > 0);
        elements.iter().filter_map(Weak::upgrade).collect()
    };

    let mut paused = 0;
    for element in live {
        if !element.is_paused() {
            element.pause();
            paused += 1;
        }
    }

    info!(paused, "playback shut down");
    paused
}
