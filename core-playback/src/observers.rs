//! Listener registries for synchronous consumers.
//!
//! UI components that cannot hold an async [`EventStream`](core_runtime::EventStream)
//! register plain callbacks here. Callbacks run on whichever task settled
//! the transition, after the controller released its own lock, so a
//! callback may call straight back into the controller.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Ordered set of callbacks for one kind of notification.
pub struct ListenerRegistry<E> {
    listeners: RwLock<Vec<(ListenerId, Listener<E>)>>,
}

impl<E> ListenerRegistry<E> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Returns `true` if `id` belonged to this registry.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Invoke every listener in subscription order.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_notify_in_subscription_order() {
        let registry = ListenerRegistry::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        registry.subscribe(move |value| first.lock().unwrap().push(("first", *value)));
        let second = seen.clone();
        registry.subscribe(move |value| second.lock().unwrap().push(("second", *value)));

        registry.notify(&7);
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let registry = ListenerRegistry::<u32>::new();
        let id = registry.subscribe(|_| {});
        assert_eq!(registry.len(), 1);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_may_subscribe_during_notify() {
        let registry = Arc::new(ListenerRegistry::<u32>::new());
        let inner = registry.clone();
        registry.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        registry.notify(&1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_are_unique_across_registries() {
        let a = ListenerRegistry::<u32>::new();
        let b = ListenerRegistry::<String>::new();
        let id_a = a.subscribe(|_| {});
        let id_b = b.subscribe(|_| {});

        assert_ne!(id_a, id_b);
        assert!(!b.unsubscribe(id_a));
    }
}
