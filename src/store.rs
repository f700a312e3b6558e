//! Observable value store.
//!
//! A [`Store`] owns one piece of canvas state and notifies its subscribers
//! synchronously after every committed change. Renderers and external
//! collaborators subscribe here instead of binding to fields directly.

use std::fmt;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

pub struct Store<T> {
    value: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_subscription: u64,
}

impl<T> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify subscribers.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value);
        self.notify();
        result
    }

    /// Mutate without notifying. Callers batching changes across several
    /// stores must call [`Store::notify`] once they are all committed.
    pub(crate) fn update_silently<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value)
    }

    pub(crate) fn notify(&mut self) {
        let value = &self.value;
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}
