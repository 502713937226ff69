//! In-memory snapshot owner with change listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::infrastructure::traits::SnapshotStore;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Holds the current snapshot and replaces it wholesale on every change.
///
/// Subscribed listeners are called with the new snapshot after each
/// `replace`, outside both locks, so a listener may read the store or
/// subscribe further listeners. Those take effect from the next `replace`.
pub struct MemoryStore<T> {
    snapshot: Mutex<T>,
    listeners: Mutex<Vec<Listener<T>>>,
    revision: AtomicU64,
}

impl<T: Clone + Send> MemoryStore<T> {
    pub fn new(initial: T) -> Self {
        Self {
            snapshot: Mutex::new(initial),
            listeners: Mutex::new(Vec::new()),
            revision: AtomicU64::new(0),
        }
    }

    /// Register a change listener.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) {
        lock(&self.listeners).push(Arc::new(listener));
    }

    /// Number of snapshots published since creation.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}

fn lock<U>(mutex: &Mutex<U>) -> MutexGuard<'_, U> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<T: Clone + Send> SnapshotStore<T> for MemoryStore<T> {
    fn current(&self) -> T {
        lock(&self.snapshot).clone()
    }

    fn replace(&self, next: T) {
        {
            let mut snapshot = lock(&self.snapshot);
            *snapshot = next.clone();
        }
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("snapshot replaced: revision={}", revision);
        let listeners: Vec<Listener<T>> = lock(&self.listeners).iter().cloned().collect();
        for listener in &listeners {
            listener(&next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_listener_when_replacing_then_receives_full_snapshot() {
        let store = MemoryStore::new(vec![1, 2]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |snapshot: &Vec<i32>| sink.lock().unwrap().push(snapshot.clone()));

        store.replace(vec![3]);

        assert_eq!(store.current(), vec![3]);
        assert_eq!(store.revision(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![vec![3]]);
    }

    #[test]
    fn given_listener_that_subscribes_when_replacing_then_does_not_block() {
        let store = Arc::new(MemoryStore::new(0));
        let calls = Arc::new(AtomicU64::new(0));
        let weak = Arc::downgrade(&store);
        let counter = Arc::clone(&calls);
        store.subscribe(move |value: &i32| {
            if let Some(store) = weak.upgrade() {
                assert_eq!(store.current(), *value);
                let counter = Arc::clone(&counter);
                store.subscribe(move |_: &i32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        store.replace(1);
        store.replace(2);

        assert_eq!(store.current(), 2);
        assert_eq!(store.revision(), 2);
        // the listener added during the first replace fires on the second
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
