use serde::{Deserialize, Serialize};

/// Toast priority level used for queue ordering and overflow eviction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ToastPriority {
    /// Low priority toast, first eviction candidate
    Low = 1,
    /// Medium priority toast (default)
    #[default]
    Medium = 2,
    /// High priority toast
    High = 3,
    /// Urgent toast, ordered ahead of everything else
    Urgent = 4,
}

impl From<u8> for ToastPriority {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Low,
            3 => Self::High,
            4 => Self::Urgent,
            _ => Self::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_u8_low() {
        let priority = ToastPriority::from(1);
        assert_eq!(priority, ToastPriority::Low);
    }

    #[test]
    fn test_priority_from_u8_medium() {
        let priority = ToastPriority::from(2);
        assert_eq!(priority, ToastPriority::Medium);
    }

    #[test]
    fn test_priority_from_u8_high() {
        let priority = ToastPriority::from(3);
        assert_eq!(priority, ToastPriority::High);
    }

    #[test]
    fn test_priority_from_u8_urgent() {
        let priority = ToastPriority::from(4);
        assert_eq!(priority, ToastPriority::Urgent);
    }

    #[test]
    fn test_priority_from_u8_invalid_defaults_to_medium() {
        let priority = ToastPriority::from(0);
        assert_eq!(priority, ToastPriority::Medium);

        let priority = ToastPriority::from(255);
        assert_eq!(priority, ToastPriority::Medium);
    }

    #[test]
    fn test_priority_default() {
        let priority: ToastPriority = Default::default();
        assert_eq!(priority, ToastPriority::Medium);
    }

    #[test]
    fn test_priority_total_order() {
        assert!(ToastPriority::Low < ToastPriority::Medium);
        assert!(ToastPriority::Medium < ToastPriority::High);
        assert!(ToastPriority::High < ToastPriority::Urgent);
    }

    #[test]
    fn test_priority_repr_values() {
        // Verify the repr(u8) values are correct
        assert_eq!(ToastPriority::Low as u8, 1);
        assert_eq!(ToastPriority::Medium as u8, 2);
        assert_eq!(ToastPriority::High as u8, 3);
        assert_eq!(ToastPriority::Urgent as u8, 4);
    }

    #[test]
    fn test_priority_from_conversion_roundtrip() {
        for priority in [
            ToastPriority::Low,
            ToastPriority::Medium,
            ToastPriority::High,
            ToastPriority::Urgent,
        ] {
            assert_eq!(ToastPriority::from(priority as u8), priority);
        }
    }

    #[test]
    fn test_priority_serde_lowercase() {
        let json = serde_json::to_string(&ToastPriority::Urgent).unwrap();
        assert_eq!(json, "\"urgent\"");

        let priority: ToastPriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(priority, ToastPriority::Low);
    }
}
