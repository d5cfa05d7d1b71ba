//! Double-buffered listener registry and subscription handles.

use crate::core::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// A change listener: called with no arguments after every dispatch.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

pub(crate) type ListenerId = u64;

#[derive(Clone)]
pub(crate) struct Entry {
    id: ListenerId,
    pub(crate) callback: Listener,
}

/// Listener lists with copy-on-write between dispatches.
///
/// `subscribe`/`unsubscribe` only touch `next`. Publishing makes `current`
/// share `next`, so the first mutation after a publish clones the list and
/// an in-flight notification keeps iterating its own snapshot.
pub(crate) struct ListenerRegistry {
    current: Arc<Vec<Entry>>,
    next: Arc<Vec<Entry>>,
    next_id: ListenerId,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        let current = Arc::new(Vec::new());
        Self {
            next: Arc::clone(&current),
            current,
            next_id: 0,
        }
    }

    pub(crate) fn add(&mut self, callback: Listener) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        Arc::make_mut(&mut self.next).push(Entry { id, callback });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) {
        if let Some(index) = self.next.iter().position(|entry| entry.id == id) {
            Arc::make_mut(&mut self.next).remove(index);
        }
    }

    /// Promote `next` to `current` and return the snapshot to notify.
    pub(crate) fn publish(&mut self) -> Arc<Vec<Entry>> {
        self.current = Arc::clone(&self.next);
        Arc::clone(&self.current)
    }

    pub(crate) fn len(&self) -> usize {
        self.next.len()
    }
}

/// Something listeners can be removed from.
pub(crate) trait ListenerHost: Send + Sync {
    fn remove_listener(&self, id: ListenerId) -> Result<(), StoreError>;
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    id: ListenerId,
    host: Weak<dyn ListenerHost>,
    subscribed: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, host: Weak<dyn ListenerHost>) -> Self {
        Self {
            id,
            host,
            subscribed: AtomicBool::new(true),
        }
    }

    /// Stop notifying this listener from the next dispatch on.
    ///
    /// Calling it again is a no-op. Fails with
    /// [`StoreError::UnsubscribeWhileDispatching`] while a reducer runs, in
    /// which case the listener stays registered.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.subscribed.load(Ordering::Acquire) {
            return Ok(());
        }

        if let Some(host) = self.host.upgrade() {
            host.remove_listener(self.id)?;
        }
        self.subscribed.store(false, Ordering::Release);
        Ok(())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
