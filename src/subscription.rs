use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Handle identifying a registered listener, returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Insertion-ordered listener registry shared by the queue and the manager
pub(crate) struct Listeners<S> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener<S>)>,
}

impl<S> Listeners<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: Listener<S>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Clone of the listener list, taken under the owner's lock so delivery
    /// can happen after the lock is released
    pub(crate) fn snapshot(&self) -> Vec<Listener<S>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Invoke every listener with the snapshot, in registration order.
///
/// A panicking listener must not prevent delivery to the rest, so each call
/// is unwound and logged in isolation.
pub(crate) fn deliver<S>(listeners: &[Listener<S>], state: &S) {
    for listener in listeners {
        if panic::catch_unwind(AssertUnwindSafe(|| listener(state))).is_err() {
            tracing::error!("toast subscriber panicked during delivery");
        }
    }
}
