use serde::{Deserialize, Serialize};

/// Rule for collapsing a new request into an existing toast instead of
/// creating a second entity
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Never merge
    None,
    /// Merge when message and kind match
    #[default]
    Similar,
    /// Merge only when message, kind, and title all match
    Duplicate,
}

/// Policy applied when admitting a request would exceed `max_size`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowStrategy {
    /// Evict the visible toast shown earliest; the head of the pending queue
    /// if nothing is visible
    #[default]
    DismissOldest,
    /// Evict the first entry strictly lower priority than the incoming
    /// request (visible first, then the queue tail-to-head); refuse admission
    /// when no such entry exists
    DismissLowestPriority,
    /// No eviction: the pending queue is exempt from `max_size` under this
    /// policy, growth is the caller's responsibility
    Queue,
    /// Refuse the incoming request outright
    IgnoreNew,
}

/// Admission and promotion policy for the toast queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// The maximum number of toasts visible at once.
    pub max_visible: usize,
    /// The maximum combined count of visible and queued toasts.
    pub max_size: usize,
    /// Insert queued toasts in priority order rather than first-in-first-out.
    pub priority_ordering: bool,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default)]
    pub overflow_strategy: OverflowStrategy,
    /// Delay in milliseconds before a queued toast is promoted to visible
    /// after a slot frees.
    pub show_delay: u64,
    /// Whether toasts promoted from the queue are auto-dismissed at all. When
    /// false a promoted toast persists until explicitly dismissed. The
    /// duration countdown always starts at promotion, never while waiting.
    #[serde(default = "default_true")]
    pub auto_dismiss_queued: bool,
    /// When false the engine imposes no caps, no merging, and no queueing:
    /// every request is shown immediately and kept until dismissed or expired.
    #[serde(default = "default_true")]
    pub queue_management: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_visible: 3,
            max_size: 10,
            priority_ordering: true,
            merge_strategy: MergeStrategy::Similar,
            overflow_strategy: OverflowStrategy::DismissOldest,
            show_delay: 300,
            auto_dismiss_queued: default_true(),
            queue_management: default_true(),
        }
    }
}

impl QueueConfig {
    /// Fewer toasts on screen, slower turnover, excess requests dropped
    pub fn conservative() -> Self {
        Self {
            max_visible: 2,
            max_size: 5,
            show_delay: 500,
            overflow_strategy: OverflowStrategy::IgnoreNew,
            ..Self::default()
        }
    }

    /// High throughput: more slots, quick promotion, always make room
    pub fn aggressive() -> Self {
        Self {
            max_visible: 5,
            max_size: 20,
            show_delay: 100,
            merge_strategy: MergeStrategy::None,
            overflow_strategy: OverflowStrategy::DismissOldest,
            ..Self::default()
        }
    }

    /// Defaults with first-in-first-out ordering instead of priorities
    pub fn simple() -> Self {
        Self {
            priority_ordering: false,
            ..Self::default()
        }
    }

    /// No queueing: what doesn't fit on screen is dropped
    pub fn immediate() -> Self {
        Self {
            max_visible: 3,
            max_size: 3,
            overflow_strategy: OverflowStrategy::IgnoreNew,
            show_delay: 0,
            ..Self::default()
        }
    }

    /// Resolve configuration conflicts without erroring: `max_size` is the
    /// binding constraint, and disabled queue management lifts every policy.
    pub fn normalized(mut self) -> Self {
        if !self.queue_management {
            self.max_visible = usize::MAX;
            self.max_size = usize::MAX;
            self.priority_ordering = false;
            self.merge_strategy = MergeStrategy::None;
            self.overflow_strategy = OverflowStrategy::Queue;
            self.show_delay = 0;
            return self;
        }
        self.max_visible = self.max_visible.min(self.max_size);
        self
    }
}

// Default value helpers for serde
const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = QueueConfig::default();

        assert_eq!(config.max_visible, 3);
        assert_eq!(config.max_size, 10);
        assert!(config.priority_ordering);
        assert_eq!(config.merge_strategy, MergeStrategy::Similar);
        assert_eq!(config.overflow_strategy, OverflowStrategy::DismissOldest);
        assert_eq!(config.show_delay, 300);
        assert!(config.auto_dismiss_queued);
        assert!(config.queue_management);
    }

    #[test]
    fn test_config_serialization() {
        let config = QueueConfig::default();
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("max_visible"));
        assert!(json.contains("merge_strategy"));
        assert!(json.contains("overflow_strategy"));
        assert!(json.contains("show_delay"));
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        // Config written before the merge/overflow/auto-dismiss fields existed
        let old_config_json = r#"{
            "max_visible": 2,
            "max_size": 6,
            "priority_ordering": false,
            "show_delay": 0
        }"#;

        let config: QueueConfig = serde_json::from_str(old_config_json).unwrap();

        assert_eq!(config.max_visible, 2);
        assert_eq!(config.max_size, 6);
        assert!(!config.priority_ordering);

        // Missing fields fall back to defaults
        assert_eq!(config.merge_strategy, MergeStrategy::Similar);
        assert_eq!(config.overflow_strategy, OverflowStrategy::DismissOldest);
        assert!(config.auto_dismiss_queued);
        assert!(config.queue_management);
    }

    #[test]
    fn test_config_deserialization_full() {
        let full_config_json = r#"{
            "max_visible": 1,
            "max_size": 4,
            "priority_ordering": true,
            "merge_strategy": "duplicate",
            "overflow_strategy": "dismiss-lowest-priority",
            "show_delay": 150,
            "auto_dismiss_queued": false,
            "queue_management": true
        }"#;

        let config: QueueConfig = serde_json::from_str(full_config_json).unwrap();

        assert_eq!(config.max_visible, 1);
        assert_eq!(config.max_size, 4);
        assert_eq!(config.merge_strategy, MergeStrategy::Duplicate);
        assert_eq!(
            config.overflow_strategy,
            OverflowStrategy::DismissLowestPriority
        );
        assert_eq!(config.show_delay, 150);
        assert!(!config.auto_dismiss_queued);
    }

    #[test]
    fn test_overflow_strategy_kebab_case() {
        assert_eq!(
            serde_json::to_string(&OverflowStrategy::IgnoreNew).unwrap(),
            "\"ignore-new\""
        );
        let strategy: OverflowStrategy = serde_json::from_str("\"dismiss-oldest\"").unwrap();
        assert_eq!(strategy, OverflowStrategy::DismissOldest);
    }

    #[test]
    fn test_preset_conservative() {
        let config = QueueConfig::conservative();
        assert_eq!(config.max_visible, 2);
        assert_eq!(config.max_size, 5);
        assert_eq!(config.show_delay, 500);
        assert_eq!(config.overflow_strategy, OverflowStrategy::IgnoreNew);
    }

    #[test]
    fn test_preset_aggressive() {
        let config = QueueConfig::aggressive();
        assert_eq!(config.max_visible, 5);
        assert_eq!(config.max_size, 20);
        assert_eq!(config.merge_strategy, MergeStrategy::None);
        assert_eq!(config.overflow_strategy, OverflowStrategy::DismissOldest);
    }

    #[test]
    fn test_preset_simple_is_fifo() {
        let config = QueueConfig::simple();
        assert!(!config.priority_ordering);
        assert_eq!(config.max_visible, QueueConfig::default().max_visible);
    }

    #[test]
    fn test_preset_immediate_never_queues() {
        let config = QueueConfig::immediate();
        assert_eq!(config.max_visible, config.max_size);
        assert_eq!(config.overflow_strategy, OverflowStrategy::IgnoreNew);
        assert_eq!(config.show_delay, 0);
    }

    #[test]
    fn test_normalized_clamps_max_visible_to_max_size() {
        let config = QueueConfig {
            max_visible: 12,
            max_size: 4,
            ..Default::default()
        }
        .normalized();

        // max_size is the binding constraint
        assert_eq!(config.max_visible, 4);
        assert_eq!(config.max_size, 4);
    }

    #[test]
    fn test_normalized_consistent_config_untouched() {
        let config = QueueConfig::default().normalized();
        assert_eq!(config, QueueConfig::default());
    }

    #[test]
    fn test_normalized_without_queue_management_lifts_policies() {
        let config = QueueConfig {
            queue_management: false,
            ..Default::default()
        }
        .normalized();

        assert_eq!(config.max_visible, usize::MAX);
        assert_eq!(config.max_size, usize::MAX);
        assert_eq!(config.merge_strategy, MergeStrategy::None);
        assert_eq!(config.overflow_strategy, OverflowStrategy::Queue);
        assert_eq!(config.show_delay, 0);
    }
}
