pub mod duration;
pub mod kind;
pub mod position;
pub mod priority;

pub use duration::{AUTO_BASE_MS, AUTO_MAX_MS, AUTO_MIN_MS, AUTO_PER_CHAR_MS, ToastDuration};
pub use kind::ToastKind;
pub use position::ToastPosition;
pub use priority::ToastPriority;

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration, time::Instant};

/// Stable identifier of a toast for its entire lifetime
///
/// Callers may supply their own; the queue generates one otherwise. An id is
/// never reused for a different logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(String);

impl ToastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ToastId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ToastId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A request to display a toast, immutable once submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastRequest {
    pub id: Option<ToastId>,
    pub message: String,
    pub title: Option<String>,
    pub kind: ToastKind,
    pub priority: ToastPriority,
    pub duration: ToastDuration,
    pub position: ToastPosition,
}

impl Default for ToastRequest {
    fn default() -> Self {
        Self {
            id: None,
            message: String::new(),
            title: None,
            kind: ToastKind::default(),
            priority: ToastPriority::default(),
            duration: ToastDuration::default(),
            position: ToastPosition::default(),
        }
    }
}

impl ToastRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_kind(mut self, kind: ToastKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_priority(mut self, priority: ToastPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, duration: impl Into<ToastDuration>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_position(mut self, position: ToastPosition) -> Self {
        self.position = position;
        self
    }

    /// Combined character count of message and title, the input to
    /// auto-duration resolution
    pub fn text_len(&self) -> usize {
        self.message.chars().count() + self.title.as_deref().map_or(0, |t| t.chars().count())
    }

    pub fn resolved_duration(&self) -> Option<Duration> {
        self.duration.resolve(self.text_len())
    }

    /// Same message and kind
    pub fn similar_to(&self, other: &ToastRequest) -> bool {
        self.message == other.message && self.kind == other.kind
    }

    /// Same message, kind, and title
    pub fn duplicate_of(&self, other: &ToastRequest) -> bool {
        self.similar_to(other) && self.title == other.title
    }
}

impl From<&str> for ToastRequest {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ToastRequest {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Partial overlay merged into an existing toast's request by `update`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastPatch {
    pub message: Option<String>,
    pub title: Option<String>,
    pub kind: Option<ToastKind>,
    pub priority: Option<ToastPriority>,
    pub duration: Option<ToastDuration>,
    pub position: Option<ToastPosition>,
}

impl ToastPatch {
    pub fn apply(&self, request: &mut ToastRequest) {
        if let Some(message) = &self.message {
            request.message = message.clone();
        }
        if let Some(title) = &self.title {
            request.title = Some(title.clone());
        }
        if let Some(kind) = &self.kind {
            request.kind = kind.clone();
        }
        if let Some(priority) = self.priority {
            request.priority = priority;
        }
        if let Some(duration) = self.duration {
            request.duration = duration;
        }
        if let Some(position) = self.position {
            request.position = position;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A live toast owned by the queue
///
/// Snapshots handed to subscribers are clones; mutating one has no effect on
/// queue state.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub request: ToastRequest,
    /// When the toast became visible
    pub created_at: Instant,
    pub updated_at: Instant,
    pub visible: bool,
    /// Set while an exit transition is in progress; guards against duplicate
    /// dismiss triggers
    pub dismissing: bool,
}

impl Toast {
    pub fn new(id: ToastId, request: ToastRequest) -> Self {
        let now = Instant::now();
        Self {
            id,
            request,
            created_at: now,
            updated_at: now,
            visible: true,
            dismissing: false,
        }
    }

    /// Fraction of the resolved duration elapsed since the toast became
    /// visible, clamped to 0..1. Always 0.0 for permanent toasts.
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(duration) = self.request.resolved_duration() else {
            return 0.0;
        };
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.created_at);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// A toast waiting for visible capacity
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedToast {
    pub id: ToastId,
    pub request: ToastRequest,
    /// Resolved at admission; ties in the queue keep insertion order
    pub priority: ToastPriority,
    pub queued_at: Instant,
}

impl QueuedToast {
    pub fn new(id: ToastId, request: ToastRequest) -> Self {
        let priority = request.priority;
        Self {
            id,
            request,
            priority,
            queued_at: Instant::now(),
        }
    }

    /// Promote into a visible toast, keeping the id
    pub fn into_toast(self) -> Toast {
        Toast::new(self.id, self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = ToastRequest::new("Saved");

        assert_eq!(request.message, "Saved");
        assert_eq!(request.id, None);
        assert_eq!(request.title, None);
        assert_eq!(request.kind, ToastKind::Info);
        assert_eq!(request.priority, ToastPriority::Medium);
        assert_eq!(request.duration, ToastDuration::Auto);
        assert_eq!(request.position, ToastPosition::Smart);
    }

    #[test]
    fn test_request_builder() {
        let request = ToastRequest::new("Upload failed")
            .with_id("upload-1")
            .with_title("Sync")
            .with_kind(ToastKind::Error)
            .with_priority(ToastPriority::High)
            .with_duration(5000)
            .with_position(ToastPosition::Top);

        assert_eq!(request.id, Some(ToastId::from("upload-1")));
        assert_eq!(request.title.as_deref(), Some("Sync"));
        assert_eq!(request.kind, ToastKind::Error);
        assert_eq!(request.priority, ToastPriority::High);
        assert_eq!(request.duration, ToastDuration::Millis(5000));
        assert_eq!(request.position, ToastPosition::Top);
    }

    #[test]
    fn test_request_text_len_counts_title() {
        let request = ToastRequest::new("abc").with_title("de");
        assert_eq!(request.text_len(), 5);

        let request = ToastRequest::new("abc");
        assert_eq!(request.text_len(), 3);
    }

    #[test]
    fn test_request_similarity_rules() {
        let a = ToastRequest::new("Saved").with_kind(ToastKind::Success);
        let b = ToastRequest::new("Saved")
            .with_kind(ToastKind::Success)
            .with_title("Documents");

        // Same message and kind, different title
        assert!(a.similar_to(&b));
        assert!(!a.duplicate_of(&b));

        let c = ToastRequest::new("Saved").with_kind(ToastKind::Info);
        assert!(!a.similar_to(&c));
    }

    #[test]
    fn test_request_deserializes_with_missing_fields() {
        let request: ToastRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.message, "hi");
        assert_eq!(request.kind, ToastKind::Info);
        assert_eq!(request.priority, ToastPriority::Medium);
    }

    #[test]
    fn test_patch_apply() {
        let mut request = ToastRequest::new("Working").with_kind(ToastKind::Info);
        let patch = ToastPatch {
            message: Some("Done".to_string()),
            kind: Some(ToastKind::Success),
            duration: Some(ToastDuration::Millis(1000)),
            ..Default::default()
        };

        patch.apply(&mut request);

        assert_eq!(request.message, "Done");
        assert_eq!(request.kind, ToastKind::Success);
        assert_eq!(request.duration, ToastDuration::Millis(1000));
        // Untouched fields survive
        assert_eq!(request.priority, ToastPriority::Medium);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ToastPatch::default().is_empty());
        let patch = ToastPatch {
            message: Some("x".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_toast_progress_permanent_is_zero() {
        let toast = Toast::new(
            ToastId::from("t"),
            ToastRequest::new("pinned").with_duration(ToastDuration::Permanent),
        );
        assert_eq!(toast.progress(Instant::now()), 0.0);
    }

    #[test]
    fn test_toast_progress_clamped() {
        let toast = Toast::new(
            ToastId::from("t"),
            ToastRequest::new("quick").with_duration(10),
        );
        let later = Instant::now() + Duration::from_secs(5);
        assert_eq!(toast.progress(later), 1.0);
    }

    #[test]
    fn test_queued_toast_promotion_keeps_id() {
        let queued = QueuedToast::new(
            ToastId::from("q-1"),
            ToastRequest::new("waiting").with_priority(ToastPriority::High),
        );
        assert_eq!(queued.priority, ToastPriority::High);

        let toast = queued.into_toast();
        assert_eq!(toast.id, ToastId::from("q-1"));
        assert!(toast.visible);
        assert!(!toast.dismissing);
    }
}
