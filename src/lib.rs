//! Toast notification queueing for in-process consumption.
//!
//! The admission engine ([`ToastQueue`]) decides whether each incoming
//! request is shown immediately, merged with an existing toast, queued, or
//! rejected, and promotes queued toasts as capacity frees. The lifecycle
//! manager ([`ToastManager`]) layers the public show/dismiss/update contract
//! and auto-dismiss timing on top, and [`handle_promise`] drives a toast
//! through loading → success/error alongside a caller's future.
//!
//! Rendering, positioning, and styling are left to subscribers: every
//! mutation fans out an immutable snapshot to registered listeners.
//!
//! ```no_run
//! use toastline::{QueueConfig, ToastManager, ToastRequest};
//!
//! # async fn demo() {
//! let toasts = ToastManager::new(QueueConfig::default());
//! toasts.subscribe(|visible| {
//!     for toast in visible {
//!         println!("{}: {}", toast.request.kind, toast.request.message);
//!     }
//! });
//! toasts.show(ToastRequest::new("Profile saved"));
//! # }
//! ```

mod constants;
mod subscription;

pub mod manager;
pub mod promise;
pub mod queue;

pub use manager::{QueueStats, ToastManager};
pub use promise::{MessageSpec, PromiseToasts, handle_promise};
pub use queue::{Admission, QueueState, ToastQueue};
pub use subscription::SubscriptionId;

pub use toastline_config::{MergeStrategy, OverflowStrategy, QueueConfig};
pub use toastline_util::{
    QueuedToast, Toast, ToastDuration, ToastId, ToastKind, ToastPatch, ToastPosition,
    ToastPriority, ToastRequest,
};
