//! Transition listeners.

use crate::core::StateValue;
use std::sync::Arc;

/// Listener called after every successful `start` and `send`.
pub type Listener = Arc<dyn Fn(&StateValue, &str) + Send + Sync>;

/// Identifies a listener registered with `on_transition`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// Listeners in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionHandle, Listener)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;
        self.listeners.push((handle, listener));
        handle
    }

    pub(crate) fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Listeners to notify, detached from `self` so a dispatch can keep
    /// running while they are called.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}
