//! Change notification for the client stores.

use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

/// Subscription identifier type.
pub type SubscriptionId = String;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// What changed in a store's cache.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent<T> {
    /// The cache was replaced by a fetch
    Loaded,
    Created(T),
    Updated(T),
    Deleted(Uuid),
}

/// Registered listeners for one store.
pub struct Subscribers<E> {
    inner: Mutex<ListenerTable<E>>,
}

struct ListenerTable<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    /// Counter for generating unique subscription IDs
    next_id: u64,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(ListenerTable {
                listeners: Vec::new(),
                next_id: 0,
            }),
        }
    }
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It is called after every cache mutation.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = format!("sub_{}", table.next_id);
        table.next_id += 1;
        table.listeners.push((id.clone(), Arc::new(listener)));
        id
    }

    /// Remove a subscription by ID.
    pub fn unsubscribe(&self, id: &str) -> bool {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match table.listeners.iter().position(|(sub, _)| sub == id) {
            Some(pos) => {
                table.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Call every listener with the event.
    ///
    /// Listeners run outside the lock, so they may subscribe or notify
    /// other stores.
    pub fn notify(&self, event: &E) {
        let listeners: Vec<Listener<E>> = {
            let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            table.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribers() {
        let subs: Subscribers<StoreEvent<String>> = Subscribers::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let id1 = subs.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&hits);
        let id2 = subs.subscribe(move |_| {
            counter.fetch_add(10, Ordering::SeqCst);
        });
        assert_ne!(id1, id2);
        assert_eq!(subs.len(), 2);

        subs.notify(&StoreEvent::Loaded);
        assert_eq!(hits.load(Ordering::SeqCst), 11);

        // Unsubscribe
        assert!(subs.unsubscribe(&id1));
        assert!(!subs.unsubscribe(&id1));
        subs.notify(&StoreEvent::Deleted(Uuid::new_v4()));
        assert_eq!(hits.load(Ordering::SeqCst), 21);

        // Clear
        subs.clear();
        assert!(subs.is_empty());
    }

    #[test]
    fn test_listener_may_resubscribe_during_notify() {
        let subs: Arc<Subscribers<u32>> = Arc::new(Subscribers::new());
        let inner = Arc::clone(&subs);
        subs.subscribe(move |_| {
            inner.subscribe(|_| {});
        });
        subs.notify(&1);
        assert_eq!(subs.len(), 2);
    }
}
