use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use toastline_config::{MergeStrategy, OverflowStrategy, QueueConfig};
use toastline_util::{QueuedToast, Toast, ToastId, ToastPatch, ToastPriority, ToastRequest};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::constants::{GENERATED_ID_PREFIX, INITIAL_VISIBLE_CAPACITY};
use crate::subscription::{Listeners, SubscriptionId, deliver};

/// Outcome of an admission decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Shown immediately
    Shown(ToastId),
    /// Waiting in the pending queue for visible capacity
    Queued(ToastId),
    /// Collapsed into an existing toast; carries the existing id
    Merged(ToastId),
    /// Refused by the overflow policy; nothing was created
    Rejected,
}

impl Admission {
    pub fn id(&self) -> Option<&ToastId> {
        match self {
            Admission::Shown(id) | Admission::Queued(id) | Admission::Merged(id) => Some(id),
            Admission::Rejected => None,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Admission::Queued(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Admission::Rejected)
    }
}

/// Point-in-time view of the queue handed to subscribers
///
/// Produced fresh on every mutation; mutating a snapshot has no effect on
/// the queue.
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    pub visible: Vec<Toast>,
    pub queued: Vec<QueuedToast>,
}

impl QueueState {
    pub fn total(&self) -> usize {
        self.visible.len() + self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.queued.is_empty()
    }
}

struct QueueInner {
    config: QueueConfig,
    visible: Vec<Toast>,
    queued: Vec<QueuedToast>,
    listeners: Listeners<QueueState>,
    /// At most one pending promotion; rescheduling replaces it
    promotion: Option<JoinHandle<()>>,
    next_id: u64,
}

impl QueueInner {
    fn generate_id(&mut self) -> ToastId {
        self.next_id += 1;
        ToastId::from(format!("{}{}", GENERATED_ID_PREFIX, self.next_id))
    }

    fn snapshot(&self) -> QueueState {
        QueueState {
            visible: self.visible.clone(),
            queued: self.queued.clone(),
        }
    }

    fn promote_ready(&self) -> bool {
        !self.queued.is_empty() && self.visible.len() < self.config.max_visible
    }

    /// Move the head of the pending queue into the visible set
    fn promote_one(&mut self) {
        let queued = self.queued.remove(0);
        debug!(id = %queued.id, "promoting queued toast to visible");
        self.visible.push(queued.into_toast());
    }
}

fn request_matches(strategy: MergeStrategy, existing: &ToastRequest, incoming: &ToastRequest) -> bool {
    match strategy {
        MergeStrategy::None => false,
        MergeStrategy::Similar => existing.similar_to(incoming),
        MergeStrategy::Duplicate => existing.duplicate_of(incoming),
    }
}

/// Single authority over whether a toast is shown, queued, merged, or
/// rejected, and over promotion ordering when capacity frees.
///
/// Cloning yields another handle to the same queue. Promotion uses tokio
/// timers, so a queue with a non-zero `show_delay` must live inside a tokio
/// runtime.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<QueueInner>>,
}

/// Non-owning handle held by timer tasks so a dropped queue stops promoting
#[derive(Clone)]
pub(crate) struct WeakToastQueue {
    inner: Weak<Mutex<QueueInner>>,
}

impl WeakToastQueue {
    pub(crate) fn upgrade(&self) -> Option<ToastQueue> {
        self.inner.upgrade().map(|inner| ToastQueue { inner })
    }
}

impl ToastQueue {
    pub fn new(config: QueueConfig) -> Self {
        let config = config.normalized();
        Self {
            inner: Arc::new(Mutex::new(QueueInner {
                config,
                visible: Vec::with_capacity(INITIAL_VISIBLE_CAPACITY),
                queued: Vec::new(),
                listeners: Listeners::new(),
                promotion: None,
                next_id: 0,
            })),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakToastQueue {
        WeakToastQueue {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a request: show it, merge it, queue it, or reject it.
    ///
    /// Merging returns the existing toast's id and mutates nothing, so no
    /// notification is sent for that case.
    pub fn enqueue(&self, request: ToastRequest) -> Admission {
        let (admission, notify) = {
            let mut inner = self.lock();

            let id = match request.id.clone() {
                Some(id) => id,
                None => inner.generate_id(),
            };

            let strategy = inner.config.merge_strategy;
            if strategy != MergeStrategy::None {
                let existing = inner
                    .visible
                    .iter()
                    .find(|t| request_matches(strategy, &t.request, &request))
                    .map(|t| t.id.clone())
                    .or_else(|| {
                        inner
                            .queued
                            .iter()
                            .find(|q| request_matches(strategy, &q.request, &request))
                            .map(|q| q.id.clone())
                    });
                if let Some(existing) = existing {
                    trace!(id = %existing, "merged toast request into existing toast");
                    return Admission::Merged(existing);
                }
            }

            if inner.visible.len() < inner.config.max_visible {
                debug!(id = %id, kind = %request.kind, "showing toast");
                inner.visible.push(Toast::new(id.clone(), request));
                (Admission::Shown(id), (inner.listeners.snapshot(), inner.snapshot()))
            } else {
                let mut evicted_visible = false;
                if inner.visible.len() + inner.queued.len() >= inner.config.max_size {
                    match inner.config.overflow_strategy {
                        OverflowStrategy::IgnoreNew => {
                            warn!(id = %id, "toast queue full, ignoring request");
                            return Admission::Rejected;
                        }
                        // The pending queue is exempt from max_size under
                        // this policy
                        OverflowStrategy::Queue => {}
                        OverflowStrategy::DismissOldest => {
                            evicted_visible = evict_oldest(&mut inner);
                        }
                        OverflowStrategy::DismissLowestPriority => {
                            match evict_lower_priority(&mut inner, request.priority) {
                                Some(was_visible) => evicted_visible = was_visible,
                                None => {
                                    warn!(
                                        id = %id,
                                        "no lower-priority eviction candidate, refusing toast"
                                    );
                                    return Admission::Rejected;
                                }
                            }
                        }
                    }
                }

                let queued = QueuedToast::new(id.clone(), request);
                if inner.config.priority_ordering {
                    // Stable insertion: before the first strictly
                    // lower-priority entry
                    let pos = inner
                        .queued
                        .iter()
                        .position(|q| q.priority < queued.priority)
                        .unwrap_or(inner.queued.len());
                    inner.queued.insert(pos, queued);
                } else {
                    inner.queued.push(queued);
                }
                debug!(id = %id, "queued toast");

                if evicted_visible {
                    // Eviction freed a visible slot; fill it like any other
                    self.schedule_promotion(&mut inner);
                }
                (Admission::Queued(id), (inner.listeners.snapshot(), inner.snapshot()))
            }
        };

        deliver(&notify.0, &notify.1);
        admission
    }

    /// Remove a toast wherever it lives. A freed visible slot triggers
    /// promotion of the next queued toast after `show_delay`.
    pub fn dequeue(&self, id: &ToastId) -> bool {
        let notify = {
            let mut inner = self.lock();
            if let Some(pos) = inner.visible.iter().position(|t| t.id == *id) {
                inner.visible.remove(pos);
                debug!(id = %id, "removed visible toast");
                self.schedule_promotion(&mut inner);
            } else if let Some(pos) = inner.queued.iter().position(|q| q.id == *id) {
                inner.queued.remove(pos);
                debug!(id = %id, "removed queued toast");
            } else {
                trace!(id = %id, "dismiss for unknown toast");
                return false;
            }
            (inner.listeners.snapshot(), inner.snapshot())
        };

        deliver(&notify.0, &notify.1);
        true
    }

    /// Empty both collections and cancel any pending promotion
    pub fn clear(&self) {
        let notify = {
            let mut inner = self.lock();
            if let Some(handle) = inner.promotion.take() {
                handle.abort();
            }
            inner.visible.clear();
            inner.queued.clear();
            (inner.listeners.snapshot(), inner.snapshot())
        };

        deliver(&notify.0, &notify.1);
    }

    /// Synchronous snapshot, no side effects
    pub fn state(&self) -> QueueState {
        self.lock().snapshot()
    }

    /// Merge new fields into a visible toast's request and bump its update
    /// timestamp. Does not re-run admission.
    pub fn update_visible(&self, id: &ToastId, patch: &ToastPatch) -> bool {
        let notify = {
            let mut inner = self.lock();
            let Some(toast) = inner.visible.iter_mut().find(|t| t.id == *id) else {
                return false;
            };
            patch.apply(&mut toast.request);
            toast.updated_at = std::time::Instant::now();
            (inner.listeners.snapshot(), inner.snapshot())
        };

        deliver(&notify.0, &notify.1);
        true
    }

    /// Mark a visible toast as dismissing so the presentation layer can run
    /// its exit transition. Returns false if the toast is unknown or already
    /// dismissing, guarding against duplicate dismiss triggers.
    pub fn begin_dismiss(&self, id: &ToastId) -> bool {
        let notify = {
            let mut inner = self.lock();
            let Some(toast) = inner.visible.iter_mut().find(|t| t.id == *id) else {
                return false;
            };
            if toast.dismissing {
                return false;
            }
            toast.dismissing = true;
            (inner.listeners.snapshot(), inner.snapshot())
        };

        deliver(&notify.0, &notify.1);
        true
    }

    /// Register a listener invoked with a fresh snapshot after every mutation
    pub fn subscribe(&self, listener: impl Fn(&QueueState) + Send + Sync + 'static) -> SubscriptionId {
        self.lock().listeners.add(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().listeners.remove(id)
    }

    /// Arrange for the next queued toast to become visible.
    ///
    /// With a zero delay the queue drains inline; otherwise a single
    /// debounced timer is armed, replacing any pending one.
    fn schedule_promotion(&self, inner: &mut QueueInner) {
        if !inner.promote_ready() {
            return;
        }

        if inner.config.show_delay == 0 {
            while inner.promote_ready() {
                inner.promote_one();
            }
            return;
        }

        if let Some(handle) = inner.promotion.take() {
            handle.abort();
        }
        let delay = Duration::from_millis(inner.config.show_delay);
        let weak = self.downgrade();
        inner.promotion = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(queue) = weak.upgrade() {
                queue.promote_next();
            }
        }));
    }

    /// Timer callback: promote the queue head if capacity is still free.
    ///
    /// The freed slot may have been refilled by a direct enqueue while the
    /// timer was pending; the promotion is then a no-op and fires again when
    /// capacity next frees.
    fn promote_next(&self) {
        let notify = {
            let mut inner = self.lock();
            inner.promotion = None;
            if !inner.promote_ready() {
                trace!("promotion fired with no free slot or empty queue");
                return;
            }
            inner.promote_one();
            self.schedule_promotion(&mut inner);
            (inner.listeners.snapshot(), inner.snapshot())
        };

        deliver(&notify.0, &notify.1);
    }
}

/// Evict the visible toast shown earliest, or the pending queue's head if
/// nothing is visible. Returns whether a visible slot was freed.
fn evict_oldest(inner: &mut QueueInner) -> bool {
    let oldest = inner
        .visible
        .iter()
        .enumerate()
        .min_by_key(|(_, t)| t.created_at)
        .map(|(pos, _)| pos);
    if let Some(pos) = oldest {
        let evicted = inner.visible.remove(pos);
        debug!(id = %evicted.id, "evicting oldest visible toast");
        true
    } else if !inner.queued.is_empty() {
        let evicted = inner.queued.remove(0);
        debug!(id = %evicted.id, "dropping oldest queued toast");
        false
    } else {
        false
    }
}

/// Evict the first entry strictly lower priority than the incoming request:
/// the lowest-priority visible toast, else the queue scanned tail-to-head.
/// `None` means no candidate exists and admission must be refused.
fn evict_lower_priority(inner: &mut QueueInner, incoming: ToastPriority) -> Option<bool> {
    let candidate = inner
        .visible
        .iter()
        .enumerate()
        .filter(|(_, t)| t.request.priority < incoming)
        .min_by_key(|(_, t)| t.request.priority)
        .map(|(pos, _)| pos);
    if let Some(pos) = candidate {
        let evicted = inner.visible.remove(pos);
        debug!(id = %evicted.id, "evicting lower-priority visible toast");
        return Some(true);
    }

    if let Some(pos) = inner.queued.iter().rposition(|q| q.priority < incoming) {
        let evicted = inner.queued.remove(pos);
        debug!(id = %evicted.id, "dropping lower-priority queued toast");
        return Some(false);
    }

    None
}
