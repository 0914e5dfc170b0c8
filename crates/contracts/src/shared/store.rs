//! Minimal observable single-slot store.
//!
//! Values are held behind `Arc` and compared by pointer: setting the value
//! already held is a no-op. Subscribers are called synchronously after the
//! internal lock is released, so they may read the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

struct StoreInner<T> {
    state: Option<Arc<T>>,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

pub struct Store<T> {
    inner: Arc<Mutex<StoreInner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> Store<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state: initial.map(Arc::new),
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current value.
    pub fn get(&self) -> Option<Arc<T>> {
        self.lock().state.clone()
    }

    /// Replace the value and notify every subscriber, unless `next` is the
    /// value already held.
    pub fn set(&self, next: Arc<T>) {
        let subscribers: Vec<Callback> = {
            let mut inner = self.lock();
            if let Some(current) = &inner.state {
                if Arc::ptr_eq(current, &next) {
                    return;
                }
            }
            inner.state = Some(next);
            inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        for subscriber in subscribers {
            subscriber();
        }
    }

    /// Register `callback`; it is invoked once immediately and then after
    /// every change. Dropping the returned [`Subscription`] unregisters it.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription<T> {
        let callback: Callback = Arc::new(callback);
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&callback)));
            id
        };

        callback();

        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

/// Handle returned by [`Store::subscribe`].
pub struct Subscription<T> {
    store: Weak<Mutex<StoreInner<T>>>,
    id: u64,
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        (count, move || {
            sink.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_subscribe_calls_back_immediately() {
        let store: Store<i32> = Store::default();
        let (count, callback) = counter();
        let _subscription = store.subscribe(callback);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(store.get().is_none());
    }

    #[test]
    fn test_set_same_value_notifies_once() {
        let store = Store::new(Some(1));
        let (count, callback) = counter();
        let _subscription = store.subscribe(callback);

        let next = Arc::new(2);
        store.set(Arc::clone(&next));
        store.set(Arc::clone(&next));

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(*store.get().unwrap(), 2);

        // Equal content in a new allocation is a change.
        store.set(Arc::new(2));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = Store::new(Some("a"));
        let (count, callback) = counter();
        let subscription = store.subscribe(callback);
        assert_eq!(store.subscriber_count(), 1);

        subscription.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);

        store.set(Arc::new("b"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_can_read_store() {
        let store = Store::new(Some(10));
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = store.subscribe(move || {
            if let Some(value) = reader.get() {
                sink.lock().unwrap().push(*value);
            }
        });

        store.set(Arc::new(11));
        assert_eq!(*seen.lock().unwrap(), vec![10, 11]);
    }
}
