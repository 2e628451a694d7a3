use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Handle returned by `Event::subscribe`, used to detach the callback later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscribers<A> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<A>)>,
}

/// Ordered list of observers for one kind of notification.
///
/// Clones share the same subscriber list, so a clone can be moved into another
/// event's callback to relay notifications. Publishing is synchronous: every
/// callback runs on the caller's thread, in registration order, before
/// `publish` returns. The lock is released before callbacks run, so a callback
/// may subscribe to the event it is handling; it will first be called on the
/// next publish.
pub struct Event<A> {
    inner: Arc<Mutex<Subscribers<A>>>,
}

impl<A> Event<A> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Subscribers {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers<A>> {
        // 回呼 panic 不會讓清單處於不一致狀態
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let mut subscribers = self.lock();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.handlers.len();
        subscribers.handlers.retain(|(existing, _)| *existing != id);
        subscribers.handlers.len() != before
    }

    /// Invokes every subscriber with `args`; returns how many were invoked.
    pub fn publish(&self, args: &A) -> usize {
        let snapshot: Vec<Handler<A>> = self
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &snapshot {
            handler(args);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.lock().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().handlers.clear();
    }
}

impl<A> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.len())
            .finish()
    }
}
