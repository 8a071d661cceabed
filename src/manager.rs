use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use toastline_config::QueueConfig;
use toastline_util::{Toast, ToastId, ToastKind, ToastPatch, ToastRequest};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::queue::{Admission, QueueState, ToastQueue, WeakToastQueue};
use crate::subscription::{Listeners, SubscriptionId, deliver};

/// Counts exposed to the thin public stats surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub visible: usize,
    pub queued: usize,
    pub total: usize,
}

struct ManagerInner {
    /// Auto-dismiss timers, keyed by toast id. A toast has at most one.
    timers: HashMap<ToastId, JoinHandle<()>>,
    visible_ids: HashSet<ToastId>,
    queued_ids: HashSet<ToastId>,
    listeners: Listeners<Vec<Toast>>,
}

/// The public show/dismiss/update contract over a [`ToastQueue`].
///
/// Owns every auto-dismiss timer. Timer bookkeeping is driven by diffing
/// queue snapshots, so capacity evictions, delayed promotions, and explicit
/// dismissals all converge on the same scheduling point. Construct one
/// long-lived instance per application, inside a tokio runtime; cloning
/// yields another handle to it.
#[derive(Clone)]
pub struct ToastManager {
    queue: ToastQueue,
    inner: Arc<Mutex<ManagerInner>>,
}

impl ToastManager {
    /// Build a manager with the given admission policy.
    ///
    /// `config.queue_management = false` yields the flat, unbounded mode:
    /// every request is shown immediately and nothing is merged or queued.
    pub fn new(config: QueueConfig) -> Self {
        let auto_dismiss_queued = config.auto_dismiss_queued;
        let queue = ToastQueue::new(config);
        let inner = Arc::new(Mutex::new(ManagerInner {
            timers: HashMap::new(),
            visible_ids: HashSet::new(),
            queued_ids: HashSet::new(),
            listeners: Listeners::new(),
        }));

        let state_inner = Arc::clone(&inner);
        let weak_queue = queue.downgrade();
        queue.subscribe(move |state| {
            on_queue_state(&state_inner, &weak_queue, auto_dismiss_queued, state);
        });

        Self { queue, inner }
    }

    fn lock(&self) -> MutexGuard<'_, ManagerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a toast. Unset fields carry their defaults (info kind, auto
    /// duration, smart position, medium priority); an auto-dismiss timer is
    /// armed when the toast becomes visible, unless its duration is
    /// permanent.
    pub fn show(&self, request: ToastRequest) -> Admission {
        self.queue.enqueue(request)
    }

    /// Cancel the toast's timer and remove it wherever it lives
    pub fn dismiss(&self, id: &ToastId) -> bool {
        self.queue.dequeue(id)
    }

    /// Cancel every timer and remove every toast
    pub fn dismiss_all(&self) {
        self.queue.clear();
    }

    /// Merge fields into a visible toast. A changed duration cancels the
    /// running timer and starts a fresh one from now with the new value.
    pub fn update(&self, id: &ToastId, patch: ToastPatch) -> bool {
        let duration_changed = patch.duration.is_some();
        if !self.queue.update_visible(id, &patch) {
            return false;
        }
        if duration_changed {
            self.reschedule_expiry(id);
        }
        true
    }

    /// First phase of a two-phase dismiss: mark the toast so the renderer
    /// can play its exit transition, and stop the auto-dismiss timer so the
    /// removal cannot fire twice. Finish with [`Self::complete_dismiss`].
    pub fn begin_dismiss(&self, id: &ToastId) -> bool {
        if !self.queue.begin_dismiss(id) {
            return false;
        }
        let mut inner = self.lock();
        if let Some(handle) = inner.timers.remove(id) {
            handle.abort();
        }
        true
    }

    /// Second phase of a two-phase dismiss; equivalent to a direct dismiss
    pub fn complete_dismiss(&self, id: &ToastId) -> bool {
        self.queue.dequeue(id)
    }

    /// Register a listener invoked with the full visible toast list, newest
    /// first, after every mutation
    pub fn subscribe(&self, listener: impl Fn(&[Toast]) + Send + Sync + 'static) -> SubscriptionId {
        self.lock()
            .listeners
            .add(Arc::new(move |toasts: &Vec<Toast>| listener(toasts)))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().listeners.remove(id)
    }

    /// Current visible toasts, newest first
    pub fn toasts(&self) -> Vec<Toast> {
        let mut toasts = self.queue.state().visible;
        toasts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        toasts
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.queue.state();
        QueueStats {
            visible: state.visible.len(),
            queued: state.queued.len(),
            total: state.total(),
        }
    }

    /// The underlying admission engine, for queue-level subscriptions
    pub fn queue(&self) -> &ToastQueue {
        &self.queue
    }

    pub fn success(&self, message: impl Into<String>) -> Admission {
        self.show(ToastRequest::new(message).with_kind(ToastKind::Success))
    }

    pub fn error(&self, message: impl Into<String>) -> Admission {
        self.show(ToastRequest::new(message).with_kind(ToastKind::Error))
    }

    pub fn warning(&self, message: impl Into<String>) -> Admission {
        self.show(ToastRequest::new(message).with_kind(ToastKind::Warning))
    }

    pub fn info(&self, message: impl Into<String>) -> Admission {
        self.show(ToastRequest::new(message).with_kind(ToastKind::Info))
    }

    fn reschedule_expiry(&self, id: &ToastId) {
        let state = self.queue.state();
        let Some(toast) = state.visible.iter().find(|t| t.id == *id) else {
            return;
        };
        let mut inner = self.lock();
        if let Some(handle) = inner.timers.remove(id) {
            handle.abort();
        }
        if toast.dismissing {
            return;
        }
        if let Some(duration) = toast.request.resolved_duration() {
            let handle = spawn_expiry(self.queue.downgrade(), id.clone(), duration);
            inner.timers.insert(id.clone(), handle);
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

/// React to an engine snapshot: abort timers of removed toasts, arm timers
/// for newly visible ones, and fan the sorted list out to subscribers.
fn on_queue_state(
    inner: &Arc<Mutex<ManagerInner>>,
    queue: &WeakToastQueue,
    auto_dismiss_queued: bool,
    state: &QueueState,
) {
    let (listeners, toasts) = {
        let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
        let current: HashSet<ToastId> = state.visible.iter().map(|t| t.id.clone()).collect();

        let gone: Vec<ToastId> = inner.visible_ids.difference(&current).cloned().collect();
        for id in gone {
            if let Some(handle) = inner.timers.remove(&id) {
                handle.abort();
            }
        }

        for toast in &state.visible {
            if inner.visible_ids.contains(&toast.id) || toast.dismissing {
                continue;
            }
            if inner.queued_ids.contains(&toast.id) && !auto_dismiss_queued {
                trace!(id = %toast.id, "promoted toast kept until explicitly dismissed");
                continue;
            }
            if let Some(duration) = toast.request.resolved_duration() {
                let handle = spawn_expiry(queue.clone(), toast.id.clone(), duration);
                inner.timers.insert(toast.id.clone(), handle);
            }
        }

        inner.visible_ids = current;
        inner.queued_ids = state.queued.iter().map(|q| q.id.clone()).collect();

        let mut toasts = state.visible.clone();
        toasts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        (inner.listeners.snapshot(), toasts)
    };

    deliver(&listeners, &toasts);
}

fn spawn_expiry(queue: WeakToastQueue, id: ToastId, duration: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if let Some(queue) = queue.upgrade() {
            debug!(id = %id, "toast duration elapsed, dismissing");
            queue.dequeue(&id);
        }
    })
}
