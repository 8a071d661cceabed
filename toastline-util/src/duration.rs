use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base display time for auto-computed durations, in milliseconds
pub const AUTO_BASE_MS: u64 = 3000;

/// Extra display time per character of message and title, in milliseconds
pub const AUTO_PER_CHAR_MS: u64 = 50;

/// Lower clamp for auto-computed durations, in milliseconds
pub const AUTO_MIN_MS: u64 = 2000;

/// Upper clamp for auto-computed durations, in milliseconds
pub const AUTO_MAX_MS: u64 = 8000;

/// How long a toast stays on screen before auto-dismissal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastDuration {
    /// Computed from the length of the message and title
    #[default]
    Auto,
    /// Never auto-dismissed; stays until explicitly removed
    Permanent,
    /// Explicit display time in milliseconds
    Millis(u64),
}

impl ToastDuration {
    /// Resolve to a concrete display time, `None` meaning "never expire".
    ///
    /// `text_len` is the combined character count of the toast's message and
    /// title. Auto durations scale with it, clamped to
    /// [`AUTO_MIN_MS`]..=[`AUTO_MAX_MS`].
    pub fn resolve(&self, text_len: usize) -> Option<Duration> {
        match self {
            ToastDuration::Permanent => None,
            ToastDuration::Millis(ms) => Some(Duration::from_millis(*ms)),
            ToastDuration::Auto => {
                let ms = AUTO_BASE_MS
                    .saturating_add(AUTO_PER_CHAR_MS.saturating_mul(text_len as u64))
                    .clamp(AUTO_MIN_MS, AUTO_MAX_MS);
                Some(Duration::from_millis(ms))
            }
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, ToastDuration::Permanent)
    }
}

impl From<u64> for ToastDuration {
    fn from(ms: u64) -> Self {
        ToastDuration::Millis(ms)
    }
}
