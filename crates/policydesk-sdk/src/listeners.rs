//! Publish/subscribe registry for session change notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Entries<E> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<E>)>,
}

/// Ordered list of listeners for events of type `E`
///
/// `publish` delivers to a snapshot taken before the first callback runs, so
/// callbacks may subscribe or unsubscribe without affecting the current
/// delivery. The lock is never held while a callback runs.
pub struct ListenerRegistry<E> {
    entries: Arc<Mutex<Entries<E>>>,
}

/// Handle returned by [`ListenerRegistry::subscribe`]
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the listener. Has no effect if the registry is gone.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

fn lock<E>(entries: &Mutex<Entries<E>>) -> MutexGuard<'_, Entries<E>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E: 'static> ListenerRegistry<E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Register a listener; it runs after every listener registered before it
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = {
            let mut entries = lock(&self.entries);
            let id = entries.next_id;
            entries.next_id += 1;
            entries.callbacks.push((id, Arc::new(callback)));
            id
        };

        let registry: Weak<Mutex<Entries<E>>> = Arc::downgrade(&self.entries);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(entries) = registry.upgrade() {
                    lock(&entries).callbacks.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Deliver an event to every current listener, in registration order
    ///
    /// Returns the number of listeners notified.
    pub fn publish(&self, event: &E) -> usize {
        let snapshot: Vec<Callback<E>> = lock(&self.entries)
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        lock(&self.entries).callbacks.len()
    }

    /// Whether no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
